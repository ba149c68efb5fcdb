//! Waveform capability consumed by the detector.
//!
//! The detector never generates waveforms itself. Anything that can turn a
//! frequency grid and a set of physical parameters into per-mode frequency-domain
//! content implements `WaveformModel`, and is handed to
//! `Interferometer::inject_waveform` by the caller.

use crate::domain::{Parameters, Polarizations};
use crate::error::DetectorError;

pub mod tabulated;

pub use tabulated::*;

/// Source of frequency-domain polarization content.
pub trait WaveformModel {
    /// Polarizations evaluated on `frequency_array`; every returned array must have
    /// the same length as the grid.
    fn frequency_domain_strain(
        &self,
        frequency_array: &[f64],
        parameters: &Parameters,
    ) -> Result<Polarizations, DetectorError>;
}

impl<F> WaveformModel for F
where
    F: Fn(&[f64], &Parameters) -> Result<Polarizations, DetectorError>,
{
    fn frequency_domain_strain(
        &self,
        frequency_array: &[f64],
        parameters: &Parameters,
    ) -> Result<Polarizations, DetectorError> {
        self(frequency_array, parameters)
    }
}
