//! `gw-detector` library crate.
//!
//! Models ground-based gravitational-wave interferometers: their geometry on the
//! Earth, their response to incoming polarizations, and their noise.
//!
//! The binary (`gwdet`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the detector model can be driven from other tools (pipelines, notebooks, etc.)

pub mod app;
pub mod cli;
pub mod detector;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod noise;
pub mod plot;
pub mod report;
pub mod waveform;
