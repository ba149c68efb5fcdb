//! Power spectral density: loading, interpolation and noise synthesis.

use std::path::{Path, PathBuf};

use num_complex::Complex64;
use rand::Rng;

use crate::error::DetectorError;
use crate::io::{CurveLibrary, read_two_column_curve};
use crate::math::LinearInterpolator;
use crate::noise::realisation::create_white_noise;

/// Boundary between plausible amplitude (strain/√Hz) and power (strain²/Hz) values.
///
/// Ground-based amplitude curves sit around 1e-24..1e-18 and power curves around
/// 1e-48..1e-36, so a curve whose minimum lands on the wrong side of this value was
/// probably supplied with the wrong convention. Heuristic only.
pub const CONVENTION_THRESHOLD: f64 = 1e-30;

/// Where a spectral-density curve comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpectralSource {
    /// Two-column file of amplitude spectral density (strain/√Hz).
    AmplitudeFile(PathBuf),
    /// Two-column file of power spectral density (strain²/Hz).
    PowerFile(PathBuf),
}

impl SpectralSource {
    /// Resolve two optional file arguments into one source.
    ///
    /// The amplitude file takes precedence when both are given.
    pub fn from_options(asd_file: Option<PathBuf>, psd_file: Option<PathBuf>) -> Option<Self> {
        match (asd_file, psd_file) {
            (Some(asd), Some(psd)) => {
                log::warn!(
                    "Both an amplitude ('{}') and a power ('{}') spectral density file were given; using the amplitude file",
                    asd.display(),
                    psd.display()
                );
                Some(SpectralSource::AmplitudeFile(asd))
            }
            (Some(asd), None) => Some(SpectralSource::AmplitudeFile(asd)),
            (None, Some(psd)) => Some(SpectralSource::PowerFile(psd)),
            (None, None) => None,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SpectralSource::AmplitudeFile(p) | SpectralSource::PowerFile(p) => p,
        }
    }
}

/// Which convention a curve was supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Amplitude,
    Power,
}

/// A curve whose magnitude looks like the other convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConventionWarning {
    pub supplied: CurveKind,
    pub minimum: f64,
}

/// Flag curves whose minimum value looks implausible for their convention.
pub fn check_curve_convention(kind: CurveKind, values: &[f64]) -> Option<ConventionWarning> {
    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let suspicious = match kind {
        CurveKind::Amplitude => minimum < CONVENTION_THRESHOLD,
        CurveKind::Power => minimum > CONVENTION_THRESHOLD,
    };
    suspicious.then_some(ConventionWarning { supplied: kind, minimum })
}

/// A detector noise curve and its interpolant.
#[derive(Debug, Clone)]
pub struct PowerSpectralDensity {
    frequencies: Vec<f64>,
    power_spectral_density: Vec<f64>,
    amplitude_spectral_density: Vec<f64>,
    interpolator: LinearInterpolator,
}

impl PowerSpectralDensity {
    /// Load a curve from `source`, resolving bare file names in `library`.
    pub fn new(source: SpectralSource, library: &CurveLibrary) -> Result<Self, DetectorError> {
        let path = library.resolve(source.path());
        log::debug!("loading spectral density from '{}'", path.display());
        let (frequencies, values) = read_two_column_curve(&path)?;
        match source {
            SpectralSource::AmplitudeFile(_) => Self::from_amplitude_curve(frequencies, values),
            SpectralSource::PowerFile(_) => Self::from_power_curve(frequencies, values),
        }
    }

    pub fn from_amplitude_curve(frequencies: Vec<f64>, amplitude: Vec<f64>) -> Result<Self, DetectorError> {
        validate_values(&amplitude)?;
        warn_on_convention(CurveKind::Amplitude, &amplitude);
        let power = amplitude.iter().map(|a| a * a).collect();
        Self::build(frequencies, power, amplitude)
    }

    pub fn from_power_curve(frequencies: Vec<f64>, power: Vec<f64>) -> Result<Self, DetectorError> {
        validate_values(&power)?;
        warn_on_convention(CurveKind::Power, &power);
        let amplitude = power.iter().map(|p| p.sqrt()).collect();
        Self::build(frequencies, power, amplitude)
    }

    fn build(frequencies: Vec<f64>, power: Vec<f64>, amplitude: Vec<f64>) -> Result<Self, DetectorError> {
        if frequencies.iter().any(|f| !f.is_finite()) {
            return Err(DetectorError::InvalidCurve("non-finite frequency".to_string()));
        }
        let max_power = power.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let interpolator = LinearInterpolator::new(frequencies.clone(), power.clone(), max_power)?;
        Ok(Self {
            frequencies,
            power_spectral_density: power,
            amplitude_spectral_density: amplitude,
            interpolator,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn power_spectral_density(&self) -> &[f64] {
        &self.power_spectral_density
    }

    pub fn amplitude_spectral_density(&self) -> &[f64] {
        &self.amplitude_spectral_density
    }

    /// Largest power value of the loaded curve (the out-of-range fill value).
    pub fn maximum_power(&self) -> f64 {
        self.interpolator.fill_value()
    }

    /// PSD at `frequency`; outside the loaded range this is `maximum_power()`.
    pub fn power_spectral_density_interpolated(&self, frequency: f64) -> f64 {
        self.interpolator.evaluate(frequency)
    }

    pub fn power_spectral_density_interpolated_array(&self, frequencies: &[f64]) -> Vec<f64> {
        self.interpolator.evaluate_many(frequencies)
    }

    /// Colored Gaussian noise on the Fourier grid of `duration` seconds sampled at
    /// `sampling_frequency`, returned as `(strain, frequencies)`.
    ///
    /// Each bin has `E|h(f)|² = PSD(f) · duration / 2`.
    pub fn get_noise_realisation<R: Rng + ?Sized>(
        &self,
        sampling_frequency: f64,
        duration: f64,
        rng: &mut R,
    ) -> Result<(Vec<Complex64>, Vec<f64>), DetectorError> {
        let (white_noise, frequencies) = create_white_noise(sampling_frequency, duration, rng)?;
        let strain = white_noise
            .iter()
            .zip(&frequencies)
            .map(|(&n, &f)| n * self.power_spectral_density_interpolated(f).sqrt())
            .collect();
        Ok((strain, frequencies))
    }
}

fn validate_values(values: &[f64]) -> Result<(), DetectorError> {
    if values.is_empty() {
        return Err(DetectorError::InvalidCurve("no samples".to_string()));
    }
    // Strictly positive: `whitened_data` divides by the curve.
    if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(DetectorError::InvalidCurve(
            "spectral density values must be finite and positive".to_string(),
        ));
    }
    Ok(())
}

fn warn_on_convention(kind: CurveKind, values: &[f64]) {
    let Some(warning) = check_curve_convention(kind, values) else {
        return;
    };
    match warning.supplied {
        CurveKind::Amplitude => log::warn!(
            "Amplitude spectral density curve has minimum {:.2e}; you may have intended to provide it as a power spectral density",
            warning.minimum
        ),
        CurveKind::Power => log::warn!(
            "Power spectral density curve has minimum {:.2e}; you may have intended to provide it as an amplitude spectral density",
            warning.minimum
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::fs;
    use std::io::Write;

    fn sample_curve() -> (Vec<f64>, Vec<f64>) {
        let f = vec![10.0, 20.0, 50.0, 100.0, 500.0, 1000.0];
        let asd = vec![1e-21, 1e-22, 2e-23, 5e-24, 8e-24, 2e-23];
        (f, asd)
    }

    fn write_curve(name: &str, f: &[f64], v: &[f64]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gwdet_psd_{}_{name}", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        for (a, b) in f.iter().zip(v) {
            writeln!(file, "{a} {b}").unwrap();
        }
        path
    }

    #[test]
    fn power_is_amplitude_squared() {
        let (f, asd) = sample_curve();
        let psd = PowerSpectralDensity::from_amplitude_curve(f, asd.clone()).unwrap();
        for (p, a) in psd.power_spectral_density().iter().zip(psd.amplitude_spectral_density()) {
            assert_eq!(*p, a * a);
        }
        assert_eq!(psd.amplitude_spectral_density(), asd.as_slice());
    }

    #[test]
    fn amplitude_and_power_files_interpolate_identically() {
        let (f, asd) = sample_curve();
        let power: Vec<f64> = asd.iter().map(|a| a * a).collect();
        let asd_path = write_curve("asd.txt", &f, &asd);
        let psd_path = write_curve("psd.txt", &f, &power);
        let lib = CurveLibrary::new("unused");

        let from_asd = PowerSpectralDensity::new(SpectralSource::AmplitudeFile(asd_path.clone()), &lib).unwrap();
        let from_psd = PowerSpectralDensity::new(SpectralSource::PowerFile(psd_path.clone()), &lib).unwrap();

        for q in [5.0, 10.0, 15.0, 20.0, 73.2, 100.0, 999.9, 1000.0, 4096.0] {
            assert_eq!(
                from_asd.power_spectral_density_interpolated(q),
                from_psd.power_spectral_density_interpolated(q),
                "at {q} Hz"
            );
        }
        fs::remove_file(asd_path).ok();
        fs::remove_file(psd_path).ok();
    }

    #[test]
    fn queries_outside_the_curve_return_the_maximum_power() {
        let (f, asd) = sample_curve();
        let psd = PowerSpectralDensity::from_amplitude_curve(f, asd).unwrap();
        let max = 1e-21 * 1e-21;
        assert_eq!(psd.maximum_power(), max);
        assert_eq!(psd.power_spectral_density_interpolated(2048.0), max);
        assert_eq!(psd.power_spectral_density_interpolated(1.0), max);
        assert_eq!(psd.power_spectral_density_interpolated(0.0), max);
        // Inside the range we interpolate.
        let mid = psd.power_spectral_density_interpolated(750.0);
        assert!(mid > 8e-24 * 8e-24 && mid < 2e-23 * 2e-23);
    }

    #[test]
    fn convention_check_is_a_warning_only() {
        let (f, asd) = sample_curve();
        let power: Vec<f64> = asd.iter().map(|a| a * a).collect();

        assert!(check_curve_convention(CurveKind::Amplitude, &asd).is_none());
        assert!(check_curve_convention(CurveKind::Power, &power).is_none());

        let warning = check_curve_convention(CurveKind::Amplitude, &power).unwrap();
        assert_eq!(warning.supplied, CurveKind::Amplitude);
        assert!(check_curve_convention(CurveKind::Power, &asd).is_some());

        // Construction still succeeds with a misidentified curve.
        assert!(PowerSpectralDensity::from_power_curve(f, asd).is_ok());
    }

    #[test]
    fn rejects_invalid_curves() {
        assert!(PowerSpectralDensity::from_power_curve(vec![], vec![]).is_err());
        assert!(PowerSpectralDensity::from_power_curve(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(PowerSpectralDensity::from_power_curve(vec![2.0, 1.0], vec![1.0, 1.0]).is_err());
        assert!(PowerSpectralDensity::from_power_curve(vec![1.0, 2.0], vec![1.0, -1.0]).is_err());
    }

    #[test]
    fn rejects_zero_spectral_density() {
        assert!(matches!(
            PowerSpectralDensity::from_power_curve(vec![1.0, 2.0, 3.0], vec![1e-46, 0.0, 1e-46]),
            Err(DetectorError::InvalidCurve(_))
        ));
        assert!(matches!(
            PowerSpectralDensity::from_amplitude_curve(vec![1.0, 2.0], vec![0.0, 1e-23]),
            Err(DetectorError::InvalidCurve(_))
        ));
    }

    #[test]
    fn source_precedence_prefers_amplitude() {
        let a = PathBuf::from("a.txt");
        let p = PathBuf::from("p.txt");
        assert_eq!(
            SpectralSource::from_options(Some(a.clone()), Some(p.clone())),
            Some(SpectralSource::AmplitudeFile(a.clone()))
        );
        assert_eq!(
            SpectralSource::from_options(None, Some(p.clone())),
            Some(SpectralSource::PowerFile(p))
        );
        assert_eq!(SpectralSource::from_options(None, None), None);
    }

    #[test]
    fn noise_variance_matches_the_curve() {
        let f = vec![0.0, 8.0, 16.0, 32.0];
        let power = vec![4.0, 1.0, 2.0, 0.5];
        let psd = PowerSpectralDensity::from_power_curve(f, power).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let (sampling_frequency, duration) = (64.0, 4.0);
        let realisations = 2000;
        let (_, frequencies) = psd.get_noise_realisation(sampling_frequency, duration, &mut rng).unwrap();
        let mut power_sum = vec![0.0; frequencies.len()];
        for _ in 0..realisations {
            let (strain, _) = psd.get_noise_realisation(sampling_frequency, duration, &mut rng).unwrap();
            for (acc, h) in power_sum.iter_mut().zip(&strain) {
                *acc += h.norm_sqr();
            }
        }

        let last = frequencies.len() - 1;
        let mut ratio_sum = 0.0;
        for k in 1..last {
            let expected = psd.power_spectral_density_interpolated(frequencies[k]) * duration / 2.0;
            let ratio = power_sum[k] / realisations as f64 / expected;
            assert!((ratio - 1.0).abs() < 0.15, "bin {k}: ratio {ratio}");
            ratio_sum += ratio;
        }
        let mean_ratio = ratio_sum / (last - 1) as f64;
        assert!((mean_ratio - 1.0).abs() < 0.02, "mean ratio {mean_ratio}");

        // DC and (even-length) Nyquist bins carry no noise.
        assert_eq!(power_sum[0], 0.0);
        assert_eq!(power_sum[last], 0.0);
    }
}
