//! Interactive two-point calibration.
//!
//! Mark point one, walk at least the configured distance, mark point two;
//! orientation and scale are then solved from the pair.

pub mod fsm;
pub mod readout;
pub mod workflow;

pub use mapfix_core as core;

pub use fsm::{evaluate, CalibrationContext, CalibrationInput, CalibrationUpdate};
pub use workflow::{CalibrationWorkflow, StepReport};

#[cfg(test)]
mod tests;
