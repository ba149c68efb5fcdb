//! Reporting utilities: data summaries, signal-to-noise and sky-map extremes.

use num_complex::Complex64;

use crate::detector::Interferometer;
use crate::domain::{PolarizationMode, SkyMapPoint};

pub mod format;

pub use format::*;

/// Per-detector description of the current frequency-domain data.
#[derive(Debug, Clone)]
pub struct DataSummary {
    pub detector: String,
    pub bins: usize,
    pub frequency_resolution: f64,
    pub max_frequency: f64,
    /// Mean of `|d|² / (PSD·T/2)` over the interior bins; about 1 for pure noise.
    pub power_ratio: f64,
}

pub fn summarize_data(interferometer: &Interferometer, duration: f64) -> DataSummary {
    let freqs = interferometer.frequency_array();
    let data = interferometer.data();
    let psd = interferometer.power_spectral_density_array();

    // DC and the last bin may be forced to zero.
    let interior = 1..data.len().saturating_sub(1);
    let count = interior.len();
    let power_ratio = if count == 0 {
        0.0
    } else {
        interior
            .map(|k| data[k].norm_sqr() / (psd[k] * duration / 2.0))
            .sum::<f64>()
            / count as f64
    };

    DataSummary {
        detector: interferometer.name().to_string(),
        bins: freqs.len(),
        frequency_resolution: freqs.get(1).copied().unwrap_or(0.0),
        max_frequency: freqs.last().copied().unwrap_or(0.0),
        power_ratio,
    }
}

/// Optimal signal-to-noise ratio `sqrt(4/T Σ |h|²/S)` of `signal` against `psd`.
///
/// Bins with a non-positive PSD are skipped.
pub fn optimal_snr(signal: &[Complex64], psd: &[f64], duration: f64) -> f64 {
    let rho2: f64 = signal
        .iter()
        .zip(psd)
        .filter(|(_, s)| **s > 0.0)
        .map(|(h, s)| h.norm_sqr() / s)
        .sum();
    (4.0 / duration * rho2).sqrt()
}

/// Extremes of an antenna-pattern sky map.
#[derive(Debug, Clone)]
pub struct SkyMapSummary {
    pub detector: String,
    pub mode: PolarizationMode,
    pub min: SkyMapPoint,
    pub max: SkyMapPoint,
    /// Root-mean-square response, weighted by solid angle (`cos dec`).
    pub rms: f64,
}

pub fn summarize_sky_map(detector: &str, mode: PolarizationMode, points: &[SkyMapPoint]) -> Option<SkyMapSummary> {
    let first = *points.first()?;
    let (mut min, mut max) = (first, first);
    let (mut weighted, mut weights) = (0.0, 0.0);
    for &p in points {
        if p.response < min.response {
            min = p;
        }
        if p.response > max.response {
            max = p;
        }
        let w = p.dec.cos();
        weighted += w * p.response * p.response;
        weights += w;
    }
    Some(SkyMapSummary {
        detector: detector.to_string(),
        mode,
        min,
        max,
        rms: if weights > 0.0 { (weighted / weights).sqrt() } else { 0.0 },
    })
}
