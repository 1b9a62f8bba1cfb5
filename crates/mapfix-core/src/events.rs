//! Events emitted by a tracking session for the host UI.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::error::{CalibrationError, LocationError};
use crate::types::{ImagePoint, MapCalibration, ReferencePoint};

/// Session output, drained by the host after each batch of updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    TrackingStarted,
    TrackingStopped,
    /// A fix was bound to the user's marked image position.
    ReferenceInitialized { reference: ReferencePoint },
    /// The bound reference was discarded.
    ReferenceInvalidated { reason: InvalidationReason },
    /// New projected user position.
    PositionUpdated {
        position: ImagePoint,
        /// Direction of travel from the fix (degrees), 0 when not reported.
        heading: f64,
        /// Distance from the reference (meters).
        distance_m: f64,
        /// True when the fix fell inside the dead zone and was held.
        held: bool,
    },
    CalibrationStepChanged {
        from: CalibrationStep,
        to: CalibrationStep,
    },
    /// Orientation and scale replaced, by two-point calibration or settings.
    CalibrationApplied { calibration: MapCalibration },
    CalibrationRejected { error: CalibrationError },
    LocationFailed { error: LocationError },
    Alert(Alert),
}

/// Notification for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl From<LocationError> for Alert {
    fn from(error: LocationError) -> Self {
        Self::new(error.alert_level(), error.to_string())
    }
}

impl From<CalibrationError> for Alert {
    fn from(error: CalibrationError) -> Self {
        Self::new(AlertLevel::Warning, error.to_string())
    }
}
