//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - polarization modes and arm identifiers (`PolarizationMode`, `Arm`)
//! - signal parameters (`Parameters`, `SkyPosition`) and waveform content (`Polarizations`)
//! - serializable detector layouts (`DetectorGeometry`) and run configuration

pub mod types;

pub use types::*;
