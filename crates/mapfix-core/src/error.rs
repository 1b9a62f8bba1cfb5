//! Error taxonomy for location acquisition, calibration, and configuration.
//!
//! Geodesy and projection math never fails; errors originate only at the
//! GPS-acquisition boundary and at calibration preconditions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::AlertLevel;

/// Failures reported by the platform location API.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    #[error("geolocation is not supported on this platform")]
    Unavailable,

    #[error("location permission denied; enable location access in settings")]
    PermissionDenied,

    #[error("timed out waiting for a location fix")]
    Timeout,

    #[error("location information is unavailable")]
    PositionUnavailable,
}

impl LocationError {
    /// Fatal errors stop the tracking session; the rest are transient.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LocationError::Unavailable | LocationError::PermissionDenied)
    }

    /// Platform numeric code (1 = denied, 2 = unavailable, 3 = timeout).
    /// A missing capability has no platform code and reports 0.
    pub fn code(&self) -> u8 {
        match self {
            LocationError::Unavailable => 0,
            LocationError::PermissionDenied => 1,
            LocationError::PositionUnavailable => 2,
            LocationError::Timeout => 3,
        }
    }

    /// Map a platform numeric code back to an error.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LocationError::Unavailable),
            1 => Some(LocationError::PermissionDenied),
            2 => Some(LocationError::PositionUnavailable),
            3 => Some(LocationError::Timeout),
            _ => None,
        }
    }

    pub fn alert_level(&self) -> AlertLevel {
        if self.is_fatal() {
            AlertLevel::Error
        } else {
            AlertLevel::Warning
        }
    }
}

/// What made a two-point calibration unsolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegenerateReason {
    /// The same image pixel was marked twice.
    CoincidentImagePoints,
    /// Both GPS fixes are the same location.
    CoincidentGpsPoints,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateReason::CoincidentImagePoints => {
                write!(f, "both points were marked at the same place on the map")
            }
            DegenerateReason::CoincidentGpsPoints => {
                write!(f, "both points have the same GPS position")
            }
        }
    }
}

/// Calibration failures. All are recovered locally: the prior calibration stays.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CalibrationError {
    #[error("degenerate calibration geometry: {reason}; redo point placement")]
    DegenerateGeometry { reason: DegenerateReason },

    #[error("moved {moved_m:.1} m, need at least {required_m:.1} m before marking point two")]
    InsufficientMovement { moved_m: f64, required_m: f64 },

    #[error("scale must be positive, got {value}")]
    InvalidScale { value: f64 },

    #[error("orientation must be a finite angle, got {value}")]
    InvalidOrientation { value: f64 },

    #[error("no GPS fix available yet")]
    NoFix,

    #[error("no calibration in progress")]
    NotInProgress,
}

/// Rejected `MapperConfig` values.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("pixels per scale unit must be positive, got {value}")]
    InvalidDensity { value: f64 },

    #[error("scale multiplier must be positive, got {value}")]
    InvalidMultiplier { value: f64 },

    #[error("zoom bounds must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidZoomBounds { min: f64, max: f64 },

    #[error("scale bounds must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidScaleBounds { min: f64, max: f64 },

    #[error("distance threshold `{name}` must be non-negative, got {value}")]
    NegativeDistance { name: &'static str, value: f64 },
}
