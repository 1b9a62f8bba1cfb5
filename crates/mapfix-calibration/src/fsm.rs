//! Two-point calibration finite state machine.
//!
//! Pure functions that compute step transitions from the current step,
//! the collected points, and one input. No I/O, no logging.

use mapfix_core::config::MapperConfig;
use mapfix_core::enums::CalibrationStep;
use mapfix_core::error::CalibrationError;
use mapfix_core::types::{CalibrationPoint, GeoPoint, ImagePoint, MapCalibration};
use mapfix_geo::calibration::{check_movement, two_point};
use mapfix_geo::geodesy::distance;

/// One stimulus to the workflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationInput {
    /// Begin (or restart) calibration.
    Start,
    /// A new GPS fix arrived.
    Fix(GeoPoint),
    /// The user marked their position on the image.
    MarkPoint(ImagePoint),
    /// Solve from the two collected points. Only meaningful in `Computing`.
    Compute,
    Cancel,
}

/// Input to the FSM: everything collected so far.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationContext<'a> {
    pub step: CalibrationStep,
    pub point1: Option<CalibrationPoint>,
    pub point2: Option<CalibrationPoint>,
    pub latest_fix: Option<GeoPoint>,
    pub config: &'a MapperConfig,
}

/// Output from the FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationUpdate {
    pub new_step: CalibrationStep,
    pub point1: Option<CalibrationPoint>,
    pub point2: Option<CalibrationPoint>,
    pub latest_fix: Option<GeoPoint>,
    /// Set on the transition into `Done`.
    pub result: Option<MapCalibration>,
    /// Why the input was rejected. The step stays put (or falls back) when set.
    pub error: Option<CalibrationError>,
    pub step_changed: bool,
}

impl CalibrationUpdate {
    fn unchanged(ctx: &CalibrationContext<'_>) -> Self {
        Self {
            new_step: ctx.step,
            point1: ctx.point1,
            point2: ctx.point2,
            latest_fix: ctx.latest_fix,
            result: None,
            error: None,
            step_changed: false,
        }
    }

    fn rejected(ctx: &CalibrationContext<'_>, error: CalibrationError) -> Self {
        Self {
            error: Some(error),
            ..Self::unchanged(ctx)
        }
    }

    fn to_step(mut self, from: CalibrationStep, step: CalibrationStep) -> Self {
        self.new_step = step;
        self.step_changed = step != from;
        self
    }
}

/// Evaluate one input against the current context.
pub fn evaluate(ctx: &CalibrationContext<'_>, input: CalibrationInput) -> CalibrationUpdate {
    match input {
        CalibrationInput::Start => evaluate_start(ctx),
        CalibrationInput::Cancel => evaluate_cancel(ctx),
        CalibrationInput::Fix(fix) => evaluate_fix(ctx, fix),
        CalibrationInput::MarkPoint(image) => evaluate_mark(ctx, image),
        CalibrationInput::Compute => evaluate_compute(ctx),
    }
}

fn evaluate_start(ctx: &CalibrationContext<'_>) -> CalibrationUpdate {
    CalibrationUpdate {
        point1: None,
        point2: None,
        ..CalibrationUpdate::unchanged(ctx)
    }
    .to_step(ctx.step, CalibrationStep::AwaitingPoint1)
}

fn evaluate_cancel(ctx: &CalibrationContext<'_>) -> CalibrationUpdate {
    if ctx.step == CalibrationStep::Idle || ctx.step.is_terminal() {
        return CalibrationUpdate::rejected(ctx, CalibrationError::NotInProgress);
    }
    CalibrationUpdate {
        point1: None,
        point2: None,
        ..CalibrationUpdate::unchanged(ctx)
    }
    .to_step(ctx.step, CalibrationStep::Cancelled)
}

fn evaluate_fix(ctx: &CalibrationContext<'_>, fix: GeoPoint) -> CalibrationUpdate {
    let update = CalibrationUpdate {
        latest_fix: Some(fix),
        ..CalibrationUpdate::unchanged(ctx)
    };

    let Some(p1) = ctx.point1 else {
        return update;
    };
    let moved = distance(&p1.geo, &fix);
    let enough = moved >= ctx.config.min_calibration_distance_m;

    match ctx.step {
        // Movement guard opens the way to point two
        CalibrationStep::AwaitingMovement if enough => {
            update.to_step(ctx.step, CalibrationStep::AwaitingPoint2)
        }
        // GPS drifted back inside the threshold
        CalibrationStep::AwaitingPoint2 if !enough => {
            update.to_step(ctx.step, CalibrationStep::AwaitingMovement)
        }
        _ => update,
    }
}

fn evaluate_mark(ctx: &CalibrationContext<'_>, image: ImagePoint) -> CalibrationUpdate {
    match ctx.step {
        CalibrationStep::AwaitingPoint1 => {
            let Some(fix) = ctx.latest_fix else {
                return CalibrationUpdate::rejected(ctx, CalibrationError::NoFix);
            };
            CalibrationUpdate {
                point1: Some(CalibrationPoint::new(image, fix)),
                ..CalibrationUpdate::unchanged(ctx)
            }
            .to_step(ctx.step, CalibrationStep::AwaitingMovement)
        }
        CalibrationStep::AwaitingMovement | CalibrationStep::AwaitingPoint2 => {
            let (Some(p1), Some(fix)) = (ctx.point1, ctx.latest_fix) else {
                return CalibrationUpdate::rejected(ctx, CalibrationError::NoFix);
            };
            if let Err(err) = check_movement(&p1.geo, &fix, ctx.config) {
                return CalibrationUpdate::rejected(ctx, err);
            }
            CalibrationUpdate {
                point2: Some(CalibrationPoint::new(image, fix)),
                ..CalibrationUpdate::unchanged(ctx)
            }
            .to_step(ctx.step, CalibrationStep::Computing)
        }
        _ => CalibrationUpdate::rejected(ctx, CalibrationError::NotInProgress),
    }
}

fn evaluate_compute(ctx: &CalibrationContext<'_>) -> CalibrationUpdate {
    if ctx.step != CalibrationStep::Computing {
        return CalibrationUpdate::unchanged(ctx);
    }
    let (Some(p1), Some(p2)) = (ctx.point1, ctx.point2) else {
        return CalibrationUpdate::rejected(ctx, CalibrationError::NotInProgress);
    };

    match two_point(&p1, &p2, ctx.config) {
        Ok(calibration) => CalibrationUpdate {
            result: Some(calibration),
            ..CalibrationUpdate::unchanged(ctx)
        }
        .to_step(ctx.step, CalibrationStep::Done),
        // Keep point one, ask for point two again
        Err(err) => CalibrationUpdate {
            point2: None,
            error: Some(err),
            ..CalibrationUpdate::unchanged(ctx)
        }
        .to_step(ctx.step, CalibrationStep::AwaitingPoint2),
    }
}
