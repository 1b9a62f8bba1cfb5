//! Enumeration types used throughout the mapper.

use serde::{Deserialize, Serialize};

/// The eight principal compass directions, each covering a 45° sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    /// Short label ("N", "NE", ...).
    pub fn abbreviation(self) -> &'static str {
        match self {
            CompassPoint::North => "N",
            CompassPoint::NorthEast => "NE",
            CompassPoint::East => "E",
            CompassPoint::SouthEast => "SE",
            CompassPoint::South => "S",
            CompassPoint::SouthWest => "SW",
            CompassPoint::West => "W",
            CompassPoint::NorthWest => "NW",
        }
    }
}

/// Lifecycle of the reference point inside a tracking session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingPhase {
    /// No reference has ever been bound.
    #[default]
    Uninitialized,
    /// A reference is bound and consistent with the current calibration.
    Calibrated,
    /// Calibration parameters changed; the next fix re-binds the reference.
    Stale,
}

/// Steps of the interactive two-point calibration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationStep {
    #[default]
    Idle,
    /// Waiting for the user to mark where they stand.
    AwaitingPoint1,
    /// Point one recorded; waiting for enough GPS movement.
    AwaitingMovement,
    /// Moved far enough; waiting for the user to mark point two.
    AwaitingPoint2,
    /// Both points recorded; solving for orientation and scale.
    Computing,
    Done,
    Cancelled,
}

impl CalibrationStep {
    /// Done and Cancelled accept no further input except a restart.
    pub fn is_terminal(self) -> bool {
        matches!(self, CalibrationStep::Done | CalibrationStep::Cancelled)
    }

    /// Steps during which the workflow wants live GPS fixes.
    pub fn needs_fixes(self) -> bool {
        matches!(
            self,
            CalibrationStep::AwaitingPoint1
                | CalibrationStep::AwaitingMovement
                | CalibrationStep::AwaitingPoint2
        )
    }
}

/// Why a bound reference point was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidationReason {
    OrientationChanged,
    ScaleChanged,
    ImageResized,
    UserPositionMoved,
    Recalibrated,
    Requested,
}

/// Severity for user-facing alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    #[default]
    Info,
    Warning,
    Error,
}
