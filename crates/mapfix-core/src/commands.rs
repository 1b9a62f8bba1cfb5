//! Commands sent from the host application to a tracking session.
//!
//! Commands are queued and applied before the next batch of location updates.

use serde::{Deserialize, Serialize};

use crate::types::{ImagePoint, MapCalibration, Size};

/// All host-initiated actions on a tracking session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    // --- Tracking ---
    /// Begin projecting fixes onto the image.
    StartTracking,
    /// Stop tracking and cancel the location watch.
    StopTracking,
    /// Drop the current reference; the next fix re-binds it.
    ResetReference,

    // --- Manual settings ---
    /// Set map orientation (degrees, normalized into [0, 360)).
    SetOrientation { degrees: f64 },
    /// Set scale (meters per scale unit, clamped to the configured range).
    SetScale { meters_per_unit: f64 },
    /// Mark where the user stands on the image.
    SetUserPosition { position: ImagePoint },
    /// Report the intrinsic size of a newly loaded image.
    SetImageSize { size: Size },
    /// Replace orientation and scale at once (e.g. restored from storage).
    ApplyCalibration { calibration: MapCalibration },

    // --- Two-point calibration ---
    StartCalibration,
    /// Pair the given image pixel with the latest fix.
    MarkCalibrationPoint { position: ImagePoint },
    CancelCalibration,
}
