//! Stateful driver around the calibration FSM.

use tracing::{debug, info, warn};

use mapfix_core::config::MapperConfig;
use mapfix_core::enums::CalibrationStep;
use mapfix_core::error::CalibrationError;
use mapfix_core::state::CalibrationView;
use mapfix_core::types::{CalibrationPoint, GeoPoint, ImagePoint, MapCalibration};

use crate::fsm::{evaluate, CalibrationContext, CalibrationInput, CalibrationUpdate};
use crate::readout::movement_readout;

/// Summary of one `handle` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub from: CalibrationStep,
    pub to: CalibrationStep,
    /// Newly solved calibration, set once on reaching `Done`.
    pub result: Option<MapCalibration>,
    pub error: Option<CalibrationError>,
}

impl StepReport {
    pub fn step_changed(&self) -> bool {
        self.from != self.to
    }
}

/// One run of the mark -> walk -> mark workflow.
#[derive(Debug, Clone)]
pub struct CalibrationWorkflow {
    config: MapperConfig,
    step: CalibrationStep,
    point1: Option<CalibrationPoint>,
    point2: Option<CalibrationPoint>,
    latest_fix: Option<GeoPoint>,
    result: Option<MapCalibration>,
}

impl CalibrationWorkflow {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            step: CalibrationStep::Idle,
            point1: None,
            point2: None,
            latest_fix: None,
            result: None,
        }
    }

    pub fn step(&self) -> CalibrationStep {
        self.step
    }

    pub fn point1(&self) -> Option<CalibrationPoint> {
        self.point1
    }

    /// Second point; only present while `Computing` or once `Done`.
    pub fn point2(&self) -> Option<CalibrationPoint> {
        self.point2
    }

    pub fn result(&self) -> Option<MapCalibration> {
        self.result
    }

    pub fn start(&mut self) -> StepReport {
        self.handle(CalibrationInput::Start)
    }

    pub fn on_fix(&mut self, fix: GeoPoint) -> StepReport {
        self.handle(CalibrationInput::Fix(fix))
    }

    pub fn mark(&mut self, image: ImagePoint) -> StepReport {
        self.handle(CalibrationInput::MarkPoint(image))
    }

    pub fn cancel(&mut self) -> StepReport {
        self.handle(CalibrationInput::Cancel)
    }

    /// Feed one input. Entering `Computing` solves immediately.
    pub fn handle(&mut self, input: CalibrationInput) -> StepReport {
        let from = self.step;
        if input == CalibrationInput::Start {
            self.result = None;
        }
        let mut update = self.evaluate(input);
        self.apply(&update);

        let mut error = update.error;
        if self.step == CalibrationStep::Computing {
            update = self.evaluate(CalibrationInput::Compute);
            self.apply(&update);
            error = error.or(update.error);
        }

        let report = StepReport {
            from,
            to: self.step,
            result: update.result,
            error,
        };
        self.log(&input, &report);
        report
    }

    /// Snapshot view for the UI.
    pub fn view(&self) -> CalibrationView {
        CalibrationView {
            step: self.step,
            point1: self.point1,
            latest_fix: self.latest_fix,
            movement: movement_readout(self.point1.as_ref(), self.latest_fix.as_ref(), &self.config),
            result: self.result,
        }
    }

    fn evaluate(&self, input: CalibrationInput) -> CalibrationUpdate {
        let ctx = CalibrationContext {
            step: self.step,
            point1: self.point1,
            point2: self.point2,
            latest_fix: self.latest_fix,
            config: &self.config,
        };
        evaluate(&ctx, input)
    }

    fn apply(&mut self, update: &CalibrationUpdate) {
        self.step = update.new_step;
        self.point1 = update.point1;
        self.point2 = update.point2;
        self.latest_fix = update.latest_fix;
        if update.result.is_some() {
            self.result = update.result;
        }
    }

    fn log(&self, input: &CalibrationInput, report: &StepReport) {
        if let Some(cal) = report.result {
            info!(
                orientation_deg = cal.orientation_deg,
                scale_m_per_unit = cal.scale_m_per_unit,
                "two-point calibration solved"
            );
        }
        if let Some(err) = report.error {
            warn!(error = %err, step = ?self.step, "calibration input rejected");
        }
        if report.step_changed() {
            debug!(from = ?report.from, to = ?report.to, input = ?input, "calibration step changed");
        }
    }
}
