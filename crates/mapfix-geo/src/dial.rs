//! Drag-to-rotate compass dial used to set orientation by hand.

use glam::DVec2;

use crate::angle::{normalize_degrees, wrap_delta};

/// Accumulates rotation as a pointer drags around the dial centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassDial {
    /// Total rotation including full turns.
    cumulative_deg: f64,
    last_pointer: Option<DVec2>,
}

impl CompassDial {
    /// Start from an existing orientation.
    pub fn new(orientation_deg: f64) -> Self {
        Self {
            cumulative_deg: orientation_deg,
            last_pointer: None,
        }
    }

    pub fn begin_drag(&mut self, pointer: DVec2) {
        self.last_pointer = Some(pointer);
    }

    /// Pointer moved to `pointer`; rotate by the angle swept around `center`.
    ///
    /// Screen y grows downward, so the swept angle is already clockwise-positive.
    pub fn drag_to(&mut self, center: DVec2, pointer: DVec2) {
        let Some(last) = self.last_pointer else {
            return;
        };
        let from = last - center;
        let to = pointer - center;
        if from == DVec2::ZERO || to == DVec2::ZERO {
            self.last_pointer = Some(pointer);
            return;
        }
        let delta = (to.y.atan2(to.x) - from.y.atan2(from.x)).to_degrees();
        self.cumulative_deg += wrap_delta(delta);
        self.last_pointer = Some(pointer);
    }

    pub fn end_drag(&mut self) {
        self.last_pointer = None;
    }

    pub fn cumulative(&self) -> f64 {
        self.cumulative_deg
    }

    /// Orientation to commit, in `[0, 360)`.
    pub fn orientation(&self) -> f64 {
        normalize_degrees(self.cumulative_deg)
    }
}
