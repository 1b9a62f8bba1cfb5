//! Screen <-> image coordinate transform and the pan/zoom state feeding it.
//!
//! The image is drawn centred in the container, scaled by `zoom` about its
//! own centre, then shifted by `pan`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use mapfix_core::config::MapperConfig;
use mapfix_core::error::ConfigError;
use mapfix_core::types::{ImagePoint, MapCalibration, ScreenPoint, Size};

/// Everything the transform depends on, for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub container: Size,
    pub image: Size,
    pub pan: DVec2,
    /// Must be > 0; bounds are enforced upstream by [`ViewportState`].
    pub zoom: f64,
}

impl ViewportTransform {
    pub fn new(container: Size, image: Size, pan: DVec2, zoom: f64) -> Self {
        Self {
            container,
            image,
            pan,
            zoom,
        }
    }

    /// Where the image centre lands on screen.
    fn screen_center(&self) -> DVec2 {
        self.container.center() + self.pan
    }

    pub fn image_to_screen(&self, p: &ImagePoint) -> ScreenPoint {
        let delta = (p.as_vec2() - self.image.center()) * self.zoom;
        ScreenPoint::from(self.screen_center() + delta)
    }

    pub fn screen_to_image(&self, p: &ScreenPoint) -> ImagePoint {
        let delta = p.as_vec2() - self.screen_center();
        ImagePoint::from(self.image.center() + delta / self.zoom)
    }

    /// Image pixel under the container centre (the fixed on-screen pin).
    pub fn center_image_point(&self) -> ImagePoint {
        self.screen_to_image(&ScreenPoint::from(self.container.center()))
    }
}

/// Pan/zoom state mutated by gestures. Zoom is always within the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    zoom: f64,
    pan: DVec2,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
    wheel_zoom_factor: f64,
    /// Pinch start: (zoom when the gesture began, finger distance then).
    pinch: Option<(f64, f64)>,
}

impl ViewportState {
    /// Viewport at zoom 1 with no pan. Rejects a config with inverted bounds.
    pub fn new(config: &MapperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: &MapperConfig) -> Self {
        Self {
            zoom: config.clamp_zoom(1.0),
            pan: DVec2::ZERO,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            wheel_zoom_factor: config.wheel_zoom_factor,
            pinch: None,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> DVec2 {
        self.pan
    }

    /// Set zoom, clamped into bounds. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.max(self.min_zoom).min(self.max_zoom);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.zoom_step);
    }

    /// Mouse wheel: positive `delta_y` (scroll down) zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        self.set_zoom(self.zoom - delta_y * self.wheel_zoom_factor);
    }

    /// Two fingers down, `distance` pixels apart.
    pub fn begin_pinch(&mut self, distance: f64) {
        if distance > 0.0 {
            self.pinch = Some((self.zoom, distance));
        }
    }

    /// Fingers moved; zoom scales with the ratio to the starting distance.
    pub fn update_pinch(&mut self, distance: f64) {
        if let Some((start_zoom, start_distance)) = self.pinch {
            self.set_zoom(start_zoom * distance / start_distance);
        }
    }

    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Drag by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan += DVec2::new(dx, dy);
    }

    pub fn set_pan(&mut self, pan: DVec2) {
        self.pan = pan;
    }

    /// Pan so that `p` sits under the container centre at the current zoom.
    pub fn center_on(&mut self, p: &ImagePoint, image: Size) {
        self.pan = -(p.as_vec2() - image.center()) * self.zoom;
    }

    /// Transform for the given container/image at the current pan/zoom.
    pub fn transform(&self, container: Size, image: Size) -> ViewportTransform {
        ViewportTransform::new(container, image, self.pan, self.zoom)
    }

    /// Meters per scale unit as displayed at the current zoom (scale-bar readout).
    pub fn effective_scale(&self, calibration: &MapCalibration) -> f64 {
        calibration.scale_m_per_unit / self.zoom
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::from_config(&MapperConfig::default())
    }
}
