//! Fundamental geographic and raster types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SCALE_M_PER_UNIT;

/// A GPS fix as delivered by the device location API.
///
/// Latitude/longitude in degrees. The optional fields are whatever the
/// platform reported alongside the fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius (meters).
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Direction of travel (degrees, 0 = North, clockwise).
    #[serde(default)]
    pub heading: Option<f64>,
    /// Ground speed (m/s).
    #[serde(default)]
    pub speed: Option<f64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: Option<u64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Pixel position in the untransformed source image (origin top-left, y down).
///
/// Not bounded by the image extent: a user who walks off the mapped area
/// projects to coordinates outside `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: f64,
    pub y: f64,
}

/// Pixel position relative to the viewport container's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Width/height in pixels. Used for both the container and the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl ImagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Euclidean pixel distance to another image point.
    pub fn distance_to(&self, other: &ImagePoint) -> f64 {
        self.as_vec2().distance(other.as_vec2())
    }
}

impl From<DVec2> for ImagePoint {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for ScreenPoint {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Center of a box of this size whose top-left is the origin.
    pub fn center(&self) -> DVec2 {
        self.as_vec2() * 0.5
    }
}

/// Binds one physical location to one image pixel.
///
/// All subsequent fixes are projected relative to this anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub image: ImagePoint,
    pub geo: GeoPoint,
}

/// One of the two (GPS, pixel) pairs collected during two-point calibration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub image: ImagePoint,
    pub geo: GeoPoint,
}

impl ReferencePoint {
    pub fn new(image: ImagePoint, geo: GeoPoint) -> Self {
        Self { image, geo }
    }
}

impl CalibrationPoint {
    pub fn new(image: ImagePoint, geo: GeoPoint) -> Self {
        Self { image, geo }
    }
}

impl From<CalibrationPoint> for ReferencePoint {
    fn from(p: CalibrationPoint) -> Self {
        Self::new(p.image, p.geo)
    }
}

/// How the loaded image relates to true-world geography.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCalibration {
    /// Degrees the image's "up" is rotated away from true north, in [0, 360).
    pub orientation_deg: f64,
    /// Real-world meters per scale unit of the unzoomed image. Always > 0.
    pub scale_m_per_unit: f64,
}

impl Default for MapCalibration {
    fn default() -> Self {
        Self {
            orientation_deg: 0.0,
            scale_m_per_unit: DEFAULT_SCALE_M_PER_UNIT,
        }
    }
}
