//! Tunable parameters for calibration, projection, and viewport interaction.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Options passed to the platform location watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    pub enable_high_accuracy: bool,
    /// The platform reports `LocationError::Timeout` after this long without a fix.
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: LOCATION_TIMEOUT_MS,
            maximum_age_ms: LOCATION_MAXIMUM_AGE_MS,
        }
    }
}

/// Configuration shared by every crate in the workspace.
///
/// Missing fields deserialize to their defaults, so a host can override
/// only what it needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Image pixels per scale unit. Used by both calibration and projection.
    pub pixels_per_scale_unit: f64,
    /// Factor applied to the two-point scale result.
    pub scale_multiplier: f64,
    /// Required GPS separation between calibration points (meters).
    pub min_calibration_distance_m: f64,
    /// Movement at which marking point two is offered (meters).
    pub soft_calibration_distance_m: f64,
    /// Fixes within this radius of the reference hold at the reference pixel.
    /// Zero disables the dead zone.
    pub dead_zone_radius_m: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub wheel_zoom_factor: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub default_scale: f64,
    pub watch: WatchOptions,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            pixels_per_scale_unit: PIXELS_PER_SCALE_UNIT,
            scale_multiplier: SCALE_MULTIPLIER,
            min_calibration_distance_m: MIN_CALIBRATION_DISTANCE_M,
            soft_calibration_distance_m: SOFT_CALIBRATION_DISTANCE_M,
            dead_zone_radius_m: DEAD_ZONE_RADIUS_M,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            wheel_zoom_factor: WHEEL_ZOOM_FACTOR,
            min_scale: MIN_SCALE_M_PER_UNIT,
            max_scale: MAX_SCALE_M_PER_UNIT,
            default_scale: DEFAULT_SCALE_M_PER_UNIT,
            watch: WatchOptions::default(),
        }
    }
}

impl MapperConfig {
    /// Check the invariants the math relies on (positive density, sane bounds).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pixels_per_scale_unit > 0.0) {
            return Err(ConfigError::InvalidDensity {
                value: self.pixels_per_scale_unit,
            });
        }
        if !(self.scale_multiplier > 0.0) {
            return Err(ConfigError::InvalidMultiplier {
                value: self.scale_multiplier,
            });
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::InvalidZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::InvalidScaleBounds {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        for (name, value) in [
            ("min_calibration_distance_m", self.min_calibration_distance_m),
            ("soft_calibration_distance_m", self.soft_calibration_distance_m),
            ("dead_zone_radius_m", self.dead_zone_radius_m),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeDistance { name, value });
            }
        }
        Ok(())
    }

    /// Clamp a zoom factor into `[min_zoom, max_zoom]`.
    ///
    /// Never panics, even on an unvalidated config; `max_zoom` wins when the
    /// bounds are inverted.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Clamp a manual scale value into `[min_scale, max_scale]`.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}
