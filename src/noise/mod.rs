//! Detector noise model.
//!
//! - measured curves and interpolation (`psd`)
//! - white-noise synthesis on a Fourier grid (`realisation`)
//! - analytic design curves (`design`)

pub mod design;
pub mod psd;
pub mod realisation;

pub use design::*;
pub use psd::*;
pub use realisation::*;
