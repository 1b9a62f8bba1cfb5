//! Geodetic-to-image mapping math.
//!
//! Great-circle geodesy, orientation/scale calibration, GPS -> image
//! projection, and the screen <-> image viewport transform. Pure functions
//! over plain data; nothing here blocks or logs.

pub use mapfix_core as core;

pub mod angle;
pub mod calibration;
pub mod dial;
pub mod geodesy;
pub mod projector;
pub mod viewport;

// Re-export key types for convenience.
pub use angle::{compass_point, normalize_degrees};
pub use dial::CompassDial;
pub use geodesy::{bearing, destination, distance};
pub use projector::{project, unproject, Projection, Projector};
pub use viewport::{ViewportState, ViewportTransform};
