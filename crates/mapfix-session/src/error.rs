//! Session-level errors.

use thiserror::Error;

use mapfix_core::error::{CalibrationError, ConfigError, LocationError};

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("tracking is already running")]
    AlreadyTracking,

    #[error("tracking is not running")]
    NotTracking,
}
