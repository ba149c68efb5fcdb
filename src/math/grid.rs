//! Frequency grid generation.
//!
//! Two kinds of grids are needed:
//! - the discrete Fourier grid of a real time series (`frequency_series`)
//! - log-spaced grids for sampling analytic noise curves (`log_space`)

use crate::error::DetectorError;

/// Number of time-domain samples implied by a sampling rate and duration.
pub fn number_of_samples(sampling_frequency: f64, duration: f64) -> Result<usize, DetectorError> {
    if !(sampling_frequency.is_finite() && duration.is_finite() && sampling_frequency > 0.0 && duration > 0.0) {
        return Err(DetectorError::InvalidGrid(format!(
            "sampling_frequency={sampling_frequency}, duration={duration} (must be finite and >0)"
        )));
    }
    let n = (sampling_frequency * duration).round();
    if n < 2.0 {
        return Err(DetectorError::InvalidGrid(format!(
            "sampling_frequency * duration = {n} samples (need at least 2)"
        )));
    }
    Ok(n as usize)
}

/// Positive-frequency grid of the real FFT of `N = round(fs * T)` samples.
///
/// `f_k = k / T` for `k = 0..=N/2`; the last bin is the Nyquist frequency when `N`
/// is even.
pub fn frequency_series(sampling_frequency: f64, duration: f64) -> Result<Vec<f64>, DetectorError> {
    let n = number_of_samples(sampling_frequency, duration)?;
    let delta_f = 1.0 / duration;
    Ok((0..=n / 2).map(|k| k as f64 * delta_f).collect())
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, DetectorError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(DetectorError::InvalidGrid(format!(
            "log range min={min}, max={max} (must be finite, >0, and max>min)"
        )));
    }
    if steps < 2 {
        return Err(DetectorError::InvalidGrid("log-spaced grid needs >= 2 steps".to_string()));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    // Pin the endpoints so the upper bound is not lost to rounding.
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_sample_count_ends_at_nyquist() {
        let f = frequency_series(16.0, 1.0).unwrap();
        assert_eq!(f.len(), 9);
        assert_eq!(f[0], 0.0);
        assert_eq!(f[8], 8.0);
    }

    #[test]
    fn odd_sample_count_stops_below_nyquist() {
        let f = frequency_series(15.0, 1.0).unwrap();
        assert_eq!(f.len(), 8);
        assert_eq!(f[7], 7.0);
    }

    #[test]
    fn spacing_is_inverse_duration() {
        let f = frequency_series(64.0, 4.0).unwrap();
        assert_eq!(f.len(), 129);
        assert!((f[1] - 0.25).abs() < 1e-15);
        assert!((f[128] - 32.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(frequency_series(0.0, 4.0).is_err());
        assert!(frequency_series(16.0, f64::NAN).is_err());
        assert!(frequency_series(1.0, 1.0).is_err());
    }

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.1, 10.0, 5).unwrap();
        assert_eq!(v[0], 0.1);
        assert_eq!(v[v.len() - 1], 10.0);
        assert!((v[2] - 1.0).abs() < 1e-12);
    }
}
