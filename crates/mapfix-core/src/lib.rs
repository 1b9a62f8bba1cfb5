//! Core types and definitions for the image-map position tracker.
//!
//! This crate defines the vocabulary shared across all other crates:
//! points, calibration, commands, events, snapshots, errors, and configuration.
//! It has no dependency on any platform location API.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
