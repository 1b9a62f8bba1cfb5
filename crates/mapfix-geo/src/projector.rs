//! GPS -> image projection relative to a reference point.
//!
//! The bearing/distance vector from the reference to the fix is rotated into
//! the image's own "up" frame and scaled into pixels. No clamping to the
//! image extent.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use mapfix_core::config::MapperConfig;
use mapfix_core::types::{GeoPoint, ImagePoint, MapCalibration, ReferencePoint};

use crate::angle::normalize_degrees;
use crate::geodesy::{bearing, destination, distance};

/// Image pixels per real-world meter for a calibration.
pub fn pixels_per_meter(calibration: &MapCalibration, pixels_per_scale_unit: f64) -> f64 {
    pixels_per_scale_unit / calibration.scale_m_per_unit
}

/// Image position of `current`.
///
/// `project(reference.geo, reference, ..)` returns `reference.image` exactly.
pub fn project(
    current: &GeoPoint,
    reference: &ReferencePoint,
    calibration: &MapCalibration,
    pixels_per_scale_unit: f64,
) -> ImagePoint {
    let d = distance(&reference.geo, current);
    let b = bearing(&reference.geo, current);
    offset_from_reference(reference, calibration, pixels_per_scale_unit, d, b)
}

fn offset_from_reference(
    reference: &ReferencePoint,
    calibration: &MapCalibration,
    pixels_per_scale_unit: f64,
    distance_m: f64,
    bearing_deg: f64,
) -> ImagePoint {
    let adjusted = normalize_degrees(bearing_deg - calibration.orientation_deg).to_radians();
    let ppm = pixels_per_meter(calibration, pixels_per_scale_unit);

    let x_offset = distance_m * adjusted.sin() * ppm;
    let y_offset = distance_m * adjusted.cos() * ppm;

    // Image y grows downward
    ImagePoint::new(reference.image.x + x_offset, reference.image.y - y_offset)
}

/// Inverse of [`project`]: the GPS position under an image pixel.
pub fn unproject(
    point: &ImagePoint,
    reference: &ReferencePoint,
    calibration: &MapCalibration,
    pixels_per_scale_unit: f64,
) -> GeoPoint {
    let delta = DVec2::new(point.x - reference.image.x, reference.image.y - point.y);
    let pixels = delta.length();
    if pixels == 0.0 {
        return GeoPoint::new(reference.geo.latitude, reference.geo.longitude);
    }
    let image_bearing = delta.x.atan2(delta.y).to_degrees();
    let true_bearing = normalize_degrees(image_bearing + calibration.orientation_deg);
    let meters = pixels / pixels_per_meter(calibration, pixels_per_scale_unit);
    destination(&reference.geo, true_bearing, meters)
}

/// One projected fix, with the intermediate values the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub position: ImagePoint,
    pub distance_m: f64,
    pub bearing_deg: f64,
    /// The fix was inside the dead zone and held at the reference pixel.
    pub held: bool,
}

/// Projector with the per-session policy applied: density and dead zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub pixels_per_scale_unit: f64,
    /// Fixes closer than this to the reference hold at the reference pixel.
    pub dead_zone_radius_m: f64,
}

impl Projector {
    pub fn new(config: &MapperConfig) -> Self {
        Self {
            pixels_per_scale_unit: config.pixels_per_scale_unit,
            dead_zone_radius_m: config.dead_zone_radius_m,
        }
    }

    /// Project a fix, holding at the reference while inside the dead zone.
    pub fn project(
        &self,
        current: &GeoPoint,
        reference: &ReferencePoint,
        calibration: &MapCalibration,
    ) -> Projection {
        let d = distance(&reference.geo, current);
        let b = bearing(&reference.geo, current);

        if d < self.dead_zone_radius_m {
            return Projection {
                position: reference.image,
                distance_m: d,
                bearing_deg: b,
                held: true,
            };
        }

        Projection {
            position: offset_from_reference(reference, calibration, self.pixels_per_scale_unit, d, b),
            distance_m: d,
            bearing_deg: b,
            held: false,
        }
    }

    pub fn unproject(
        &self,
        point: &ImagePoint,
        reference: &ReferencePoint,
        calibration: &MapCalibration,
    ) -> GeoPoint {
        unproject(point, reference, calibration, self.pixels_per_scale_unit)
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(&MapperConfig::default())
    }
}
