//! Live position tracking on a calibrated image.
//!
//! Owns the reference-point state machine, applies host commands, consumes
//! location updates from a cancelable watch, and produces events and
//! snapshots for the host UI.

pub mod engine;
pub mod error;
pub mod location;
pub mod runner;

pub use mapfix_core as core;
pub use engine::{TrackingSession, TrackingState};
pub use error::SessionError;
pub use location::{CancelToken, LocationSource, LocationUpdate, ScriptedSource, WatchHandle};
pub use runner::TrackingRunner;
