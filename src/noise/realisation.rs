//! Frequency-domain white Gaussian noise.

use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::DetectorError;
use crate::math::{frequency_series, number_of_samples};

/// Unit-PSD white noise on the Fourier grid of `duration` seconds at
/// `sampling_frequency`, returned as `(noise, frequencies)`.
///
/// Real and imaginary parts are drawn from `N(0, ½√T)` so that
/// `E|n(f)|² = T/2`, the one-sided normalization for a unit PSD. The DC bin, and
/// the Nyquist bin when the sample count is even, must be real for a real time
/// series; they are set to zero.
pub fn create_white_noise<R: Rng + ?Sized>(
    sampling_frequency: f64,
    duration: f64,
    rng: &mut R,
) -> Result<(Vec<Complex64>, Vec<f64>), DetectorError> {
    let n_samples = number_of_samples(sampling_frequency, duration)?;
    let frequencies = frequency_series(sampling_frequency, duration)?;

    let sigma = 0.5 * duration.sqrt();
    let normal =
        Normal::new(0.0, sigma).map_err(|e| DetectorError::InvalidGrid(format!("noise distribution error: {e}")))?;

    let mut noise: Vec<Complex64> = (0..frequencies.len())
        .map(|_| Complex64::new(normal.sample(&mut *rng), normal.sample(&mut *rng)))
        .collect();

    noise[0] = Complex64::new(0.0, 0.0);
    if n_samples % 2 == 0 {
        let last = noise.len() - 1;
        noise[last] = Complex64::new(0.0, 0.0);
    }

    Ok((noise, frequencies))
}
