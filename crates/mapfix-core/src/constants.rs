//! Mapping constants and tuning parameters.

// --- Geodesy ---

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// --- Scale ---

/// Image pixels per scale unit (one centimeter at an assumed ~96 DPI).
///
/// A display-density assumption, not measured from the device. Overridable
/// through `MapperConfig::pixels_per_scale_unit`.
pub const PIXELS_PER_SCALE_UNIT: f64 = 38.0;

/// Multiplier applied to the two-point scale result.
pub const SCALE_MULTIPLIER: f64 = 1.0;

/// Initial scale before any calibration (meters per scale unit).
pub const DEFAULT_SCALE_M_PER_UNIT: f64 = 100.0;

/// Lower bound of the manual scale input (meters per scale unit).
pub const MIN_SCALE_M_PER_UNIT: f64 = 10.0;

/// Upper bound of the manual scale input (meters per scale unit).
pub const MAX_SCALE_M_PER_UNIT: f64 = 500.0;

// --- Calibration ---

/// Minimum GPS separation between the two calibration points (meters).
pub const MIN_CALIBRATION_DISTANCE_M: f64 = 10.0;

/// Movement at which marking point two is offered, though not yet accepted.
pub const SOFT_CALIBRATION_DISTANCE_M: f64 = 5.0;

/// Image distance below which two marked points count as coincident (pixels).
pub const MIN_IMAGE_SEPARATION_PX: f64 = 1e-9;

// --- Tracking ---

/// Fixes closer than this to the reference are held at the reference pixel.
pub const DEAD_ZONE_RADIUS_M: f64 = 5.0;

// --- Viewport ---

pub const MIN_ZOOM: f64 = 0.5;

pub const MAX_ZOOM: f64 = 3.0;

/// Zoom change per zoom-in/zoom-out button press.
pub const ZOOM_STEP: f64 = 0.2;

/// Zoom change per unit of wheel delta (sign inverted: wheel down zooms out).
pub const WHEEL_ZOOM_FACTOR: f64 = 0.01;

// --- Location watch ---

/// Time allowed for the platform to produce a fix (milliseconds).
pub const LOCATION_TIMEOUT_MS: u64 = 10_000;

/// Oldest cached fix the platform may return (milliseconds).
pub const LOCATION_MAXIMUM_AGE_MS: u64 = 1_000;
