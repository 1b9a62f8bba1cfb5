//! Tracking session: the stateful core a host drives.
//!
//! `TrackingSession` owns the reference point, the current calibration, and an
//! optional two-point calibration workflow. Host commands are queued and
//! applied before each batch of fixes so that any invalidation lands before
//! the next projection. Completely headless; the host drains events and reads
//! snapshots.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use mapfix_calibration::workflow::{CalibrationWorkflow, StepReport};
use mapfix_core::commands::SessionCommand;
use mapfix_core::config::MapperConfig;
use mapfix_core::enums::{AlertLevel, InvalidationReason, TrackingPhase};
use mapfix_core::error::{CalibrationError, LocationError};
use mapfix_core::events::{Alert, SessionEvent};
use mapfix_core::state::SessionSnapshot;
use mapfix_core::types::{GeoPoint, ImagePoint, MapCalibration, ReferencePoint, Size};
use mapfix_geo::angle::compass_point;
use mapfix_geo::calibration::manual;
use mapfix_geo::projector::{Projection, Projector};

use crate::error::SessionError;

/// Reference-point lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingState {
    Uninitialized,
    Calibrated {
        reference: ReferencePoint,
        calibration: MapCalibration,
    },
    /// Calibration changed since the reference was bound.
    Stale,
}

impl TrackingState {
    pub fn phase(&self) -> TrackingPhase {
        match self {
            TrackingState::Uninitialized => TrackingPhase::Uninitialized,
            TrackingState::Calibrated { .. } => TrackingPhase::Calibrated,
            TrackingState::Stale => TrackingPhase::Stale,
        }
    }
}

/// The tracking session. Owns all mutable mapping state.
pub struct TrackingSession {
    config: MapperConfig,
    projector: Projector,
    state: TrackingState,
    calibration: MapCalibration,
    /// Where the next reference binds on the image.
    user_position: ImagePoint,
    image_size: Option<Size>,
    tracking: bool,
    last_fix: Option<GeoPoint>,
    heading: f64,
    workflow: Option<CalibrationWorkflow>,
    /// Bumped each time tracking or a calibration walk starts.
    fix_demand: u64,
    command_queue: VecDeque<SessionCommand>,
    events: Vec<SessionEvent>,
}

impl TrackingSession {
    /// Create a session after validating `config`.
    pub fn new(config: MapperConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let calibration = manual(0.0, config.default_scale)?;
        Ok(Self {
            projector: Projector::new(&config),
            config,
            state: TrackingState::Uninitialized,
            calibration,
            user_position: ImagePoint::default(),
            image_size: None,
            tracking: false,
            last_fix: None,
            heading: 0.0,
            workflow: None,
            fix_demand: 0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn phase(&self) -> TrackingPhase {
        self.state.phase()
    }

    pub fn calibration(&self) -> MapCalibration {
        self.calibration
    }

    pub fn reference(&self) -> Option<ReferencePoint> {
        match self.state {
            TrackingState::Calibrated { reference, .. } => Some(reference),
            _ => None,
        }
    }

    pub fn user_position(&self) -> ImagePoint {
        self.user_position
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// True while tracking or while a calibration walk needs live fixes.
    pub fn wants_fixes(&self) -> bool {
        self.tracking
            || self
                .workflow
                .as_ref()
                .is_some_and(|wf| wf.step().needs_fixes())
    }

    /// Counter of tracking and calibration starts.
    ///
    /// A watch halted by a fatal error may reopen once this moves on.
    pub fn fix_demand(&self) -> u64 {
        self.fix_demand
    }

    /// Queue a host command for the next `process_commands`.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply all queued commands in order. Failures are reported as events.
    pub fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.apply(command) {
                debug!(error = %err, "queued command failed");
            }
        }
    }

    /// Apply one command now. A failure is also reported as events.
    pub fn apply(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        let result = self.handle_command(command);
        if let Err(err) = &result {
            self.report_error(err);
        }
        result
    }

    fn handle_command(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        match command {
            SessionCommand::StartTracking => self.start_tracking(),
            SessionCommand::StopTracking => self.stop_tracking(),
            SessionCommand::ResetReference => {
                self.invalidate(InvalidationReason::Requested);
                Ok(())
            }
            SessionCommand::SetOrientation { degrees } => self.set_orientation(degrees),
            SessionCommand::SetScale { meters_per_unit } => self.set_scale(meters_per_unit),
            SessionCommand::SetUserPosition { position } => {
                self.set_user_position(position);
                Ok(())
            }
            SessionCommand::SetImageSize { size } => {
                self.set_image_size(size);
                Ok(())
            }
            SessionCommand::ApplyCalibration { calibration } => {
                self.apply_calibration(calibration)
            }
            SessionCommand::StartCalibration => {
                self.start_calibration();
                Ok(())
            }
            SessionCommand::MarkCalibrationPoint { position } => {
                self.mark_calibration_point(position)
            }
            SessionCommand::CancelCalibration => self.cancel_calibration(),
        }
    }

    // --- Tracking ---

    pub fn start_tracking(&mut self) -> Result<(), SessionError> {
        if self.tracking {
            return Err(SessionError::AlreadyTracking);
        }
        self.tracking = true;
        self.fix_demand += 1;
        info!(phase = ?self.phase(), "tracking started");
        self.events.push(SessionEvent::TrackingStarted);
        Ok(())
    }

    pub fn stop_tracking(&mut self) -> Result<(), SessionError> {
        if !self.tracking {
            return Err(SessionError::NotTracking);
        }
        self.tracking = false;
        info!("tracking stopped");
        self.events.push(SessionEvent::TrackingStopped);
        Ok(())
    }

    /// Discard the bound reference; the next fix re-binds it.
    ///
    /// Returns false when there was no bound reference.
    pub fn invalidate(&mut self, reason: InvalidationReason) -> bool {
        if !matches!(self.state, TrackingState::Calibrated { .. }) {
            return false;
        }
        self.state = TrackingState::Stale;
        info!(?reason, "reference invalidated");
        self.events.push(SessionEvent::ReferenceInvalidated { reason });
        true
    }

    /// Bind `fix` to the current user position on the image.
    pub fn initialize_reference(&mut self, fix: GeoPoint) -> ReferencePoint {
        let reference = ReferencePoint::new(self.user_position, fix);
        self.state = TrackingState::Calibrated {
            reference,
            calibration: self.calibration,
        };
        info!(
            x = reference.image.x,
            y = reference.image.y,
            latitude = fix.latitude,
            longitude = fix.longitude,
            "reference initialized"
        );
        self.events.push(SessionEvent::ReferenceInitialized { reference });
        reference
    }

    /// Consume one GPS fix.
    ///
    /// Feeds any calibration walk, then (while tracking) either binds the
    /// reference or projects the fix. Returns the projection when tracking.
    pub fn handle_fix(&mut self, fix: GeoPoint) -> Option<Projection> {
        self.last_fix = Some(fix);
        self.heading = fix.heading.unwrap_or(0.0);

        if let Some(wf) = self.workflow.as_mut() {
            let report = wf.on_fix(fix);
            self.record_step(&report);
        }

        if !self.tracking {
            return None;
        }

        let projection = match self.state {
            TrackingState::Uninitialized | TrackingState::Stale => {
                let reference = self.initialize_reference(fix);
                Projection {
                    position: reference.image,
                    distance_m: 0.0,
                    bearing_deg: 0.0,
                    held: false,
                }
            }
            TrackingState::Calibrated {
                reference,
                calibration,
            } => self.projector.project(&fix, &reference, &calibration),
        };

        self.user_position = projection.position;
        debug!(
            x = projection.position.x,
            y = projection.position.y,
            distance_m = projection.distance_m,
            held = projection.held,
            "position updated"
        );
        self.events.push(SessionEvent::PositionUpdated {
            position: projection.position,
            heading: self.heading,
            distance_m: projection.distance_m,
            held: projection.held,
        });
        Some(projection)
    }

    /// Consume one watch error. Fatal errors stop tracking.
    pub fn handle_location_error(&mut self, error: LocationError) {
        warn!(code = error.code(), fatal = error.is_fatal(), %error, "location error");
        self.events.push(SessionEvent::LocationFailed { error });
        self.events.push(SessionEvent::Alert(Alert::from(error)));
        if error.is_fatal() && self.tracking {
            self.tracking = false;
            self.events.push(SessionEvent::TrackingStopped);
        }
    }

    // --- Manual settings ---

    /// Set orientation, normalized into `[0, 360)`. Non-finite angles are rejected.
    pub fn set_orientation(&mut self, degrees: f64) -> Result<(), SessionError> {
        let checked = manual(degrees, self.calibration.scale_m_per_unit)?;
        self.calibration.orientation_deg = checked.orientation_deg;
        self.invalidate(InvalidationReason::OrientationChanged);
        Ok(())
    }

    /// Set scale, clamped to the configured range. Non-positive values are rejected.
    pub fn set_scale(&mut self, meters_per_unit: f64) -> Result<(), SessionError> {
        let checked = manual(self.calibration.orientation_deg, meters_per_unit)?;
        self.calibration.scale_m_per_unit = self.config.clamp_scale(checked.scale_m_per_unit);
        self.invalidate(InvalidationReason::ScaleChanged);
        Ok(())
    }

    /// Mark where the user stands on the image.
    pub fn set_user_position(&mut self, position: ImagePoint) {
        self.user_position = position;
        self.invalidate(InvalidationReason::UserPositionMoved);
    }

    /// A new image was loaded. The user position resets to its centre.
    pub fn set_image_size(&mut self, size: Size) {
        self.image_size = Some(size);
        self.user_position = ImagePoint::from(size.center());
        self.invalidate(InvalidationReason::ImageResized);
    }

    /// Replace orientation and scale at once.
    pub fn apply_calibration(&mut self, calibration: MapCalibration) -> Result<(), SessionError> {
        let checked = manual(calibration.orientation_deg, calibration.scale_m_per_unit)?;
        self.calibration = checked;
        self.invalidate(InvalidationReason::Recalibrated);
        self.events.push(SessionEvent::CalibrationApplied {
            calibration: checked,
        });
        Ok(())
    }

    // --- Two-point calibration ---

    /// Start (or restart) the calibration walk.
    pub fn start_calibration(&mut self) {
        let fresh = self.workflow.is_none();
        let last_fix = self.last_fix;
        let config = self.config;
        let wf = self
            .workflow
            .get_or_insert_with(|| CalibrationWorkflow::new(config));
        let mut report = wf.start();
        self.fix_demand += 1;
        // A new workflow has not seen any fix yet
        if fresh {
            if let Some(fix) = last_fix {
                let seeded = wf.on_fix(fix);
                report.to = seeded.to;
            }
        }
        self.record_step(&report);
    }

    /// Pair `position` with the latest fix as the next calibration point.
    pub fn mark_calibration_point(&mut self, position: ImagePoint) -> Result<(), SessionError> {
        let Some(wf) = self.workflow.as_mut() else {
            return Err(CalibrationError::NotInProgress.into());
        };
        let report = wf.mark(position);
        let point2 = wf.point2();
        self.record_step(&report);

        if let (Some(calibration), Some(point2)) = (report.result, point2) {
            self.finish_calibration(calibration, ReferencePoint::from(point2));
        }
        match report.error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn cancel_calibration(&mut self) -> Result<(), SessionError> {
        let Some(wf) = self.workflow.as_mut() else {
            return Err(CalibrationError::NotInProgress.into());
        };
        let report = wf.cancel();
        self.record_step(&report);
        match report.error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Adopt a solved calibration. Point two becomes the reference.
    fn finish_calibration(&mut self, calibration: MapCalibration, reference: ReferencePoint) {
        self.calibration = calibration;
        self.user_position = reference.image;
        self.state = TrackingState::Calibrated {
            reference,
            calibration,
        };
        info!(
            orientation_deg = calibration.orientation_deg,
            scale_m_per_unit = calibration.scale_m_per_unit,
            "calibration applied"
        );
        self.events.push(SessionEvent::CalibrationApplied { calibration });
        self.events.push(SessionEvent::ReferenceInitialized { reference });
    }

    fn record_step(&mut self, report: &StepReport) {
        if report.step_changed() {
            self.events.push(SessionEvent::CalibrationStepChanged {
                from: report.from,
                to: report.to,
            });
        }
    }

    fn report_error(&mut self, error: &SessionError) {
        match error {
            SessionError::Calibration(err) => {
                self.events
                    .push(SessionEvent::CalibrationRejected { error: *err });
                self.events.push(SessionEvent::Alert(Alert::from(*err)));
            }
            SessionError::Location(err) => {
                self.events.push(SessionEvent::Alert(Alert::from(*err)));
            }
            other => {
                self.events.push(SessionEvent::Alert(Alert::new(
                    AlertLevel::Warning,
                    other.to_string(),
                )));
            }
        }
    }

    // --- Output ---

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tracking: self.tracking,
            phase: self.phase(),
            calibration: self.calibration,
            orientation_name: compass_point(self.calibration.orientation_deg),
            reference: self.reference(),
            user_position: self.user_position,
            heading: self.heading,
            last_fix: self.last_fix,
            image_size: self.image_size,
            calibration_workflow: self.workflow.as_ref().map(|wf| wf.view()),
        }
    }
}
