//! Analytic design sensitivity curves.
//!
//! Used as the default noise model when no curve file is configured.

use crate::error::DetectorError;
use crate::math::log_space;
use crate::noise::psd::PowerSpectralDensity;

/// Lowest frequency at which the analytic fit is meaningful.
pub const DESIGN_MIN_FREQUENCY: f64 = 10.0;

/// Upper edge of the default design-curve grid; covers the Nyquist frequency of
/// 16384 Hz sampling.
pub const DESIGN_MAX_FREQUENCY: f64 = 8192.0;

/// Number of log-spaced samples in the default design-curve grid.
pub const DESIGN_POINTS: usize = 2000;

/// Reference frequency of the Advanced LIGO fit.
const F0: f64 = 215.0;

/// Analytic fit to the Advanced LIGO zero-detuning, high-power design PSD
/// (Ajith 2011, arXiv:1107.1267, Eq. 4.7), in strain²/Hz.
pub fn advanced_ligo_design_psd(frequency: f64) -> f64 {
    let x = frequency / F0;
    let x2 = x * x;
    1e-49 * (x.powf(-4.14) - 5.0 / x2 + 111.0 * (1.0 - x2 + 0.5 * x2 * x2) / (1.0 + 0.5 * x2))
}

/// Sample the Advanced LIGO design curve on `points` log-spaced frequencies in
/// `[10 Hz, max_frequency]`.
pub fn advanced_ligo_design(max_frequency: f64, points: usize) -> Result<PowerSpectralDensity, DetectorError> {
    let frequencies = log_space(DESIGN_MIN_FREQUENCY, max_frequency, points)?;
    let power = frequencies.iter().map(|&f| advanced_ligo_design_psd(f)).collect();
    PowerSpectralDensity::from_power_curve(frequencies, power)
}

/// The design curve on the default grid shared by every detector.
pub fn default_design_noise() -> Result<PowerSpectralDensity, DetectorError> {
    advanced_ligo_design(DESIGN_MAX_FREQUENCY, DESIGN_POINTS)
}
