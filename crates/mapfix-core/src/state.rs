//! Session snapshot: the complete visible state handed to the host UI.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{CalibrationPoint, GeoPoint, ImagePoint, MapCalibration, ReferencePoint, Size};

/// Everything the host needs to draw the marker and settings panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tracking: bool,
    pub phase: TrackingPhase,
    pub calibration: MapCalibration,
    /// Compass sector of the current orientation, for display.
    pub orientation_name: CompassPoint,
    pub reference: Option<ReferencePoint>,
    /// Latest projected (or manually marked) user position.
    pub user_position: ImagePoint,
    /// Heading of the latest fix (degrees), 0 when not reported.
    pub heading: f64,
    pub last_fix: Option<GeoPoint>,
    pub image_size: Option<Size>,
    pub calibration_workflow: Option<CalibrationView>,
}

/// Progress of an in-flight two-point calibration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationView {
    pub step: CalibrationStep,
    pub point1: Option<CalibrationPoint>,
    pub latest_fix: Option<GeoPoint>,
    pub movement: MovementReadout,
    /// Result of the last successful solve.
    pub result: Option<MapCalibration>,
}

/// Live distance readout while walking from point one to point two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementReadout {
    /// Distance from point one to the latest fix (meters).
    pub moved_m: f64,
    /// Required separation (meters).
    pub required_m: f64,
    /// Progress bar fill in [0, 1]; full at twice the required distance.
    pub progress: f64,
    /// Marking point two may be offered.
    pub can_mark: bool,
    /// Marking point two will be accepted.
    pub sufficient: bool,
}
