//! Shared simulation pipeline used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! detector selection -> noise model -> data -> injection -> summaries
//!
//! The command handlers in `app` can then focus on presentation (printing, plots,
//! exports).

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::path::{Path, PathBuf};

use nalgebra::Matrix3;
use num_complex::Complex64;
use rayon::prelude::*;

use crate::detector::response::antenna_response_for_tensor;
use crate::detector::{DataSource, Interferometer, KnownDetector};
use crate::domain::{Parameters, PolarizationMode, SimulationConfig, SkyMapPoint, SkyPosition};
use crate::error::DetectorError;
use crate::io::{CurveLibrary, read_detector_json};
use crate::math::frequency_series;
use crate::noise::{PowerSpectralDensity, SpectralSource, default_design_noise};
use crate::report::optimal_snr;
use crate::waveform::WaveformModel;

/// A detector to build: built-in or loaded from JSON.
#[derive(Debug, Clone)]
pub enum DetectorSpec {
    Known(KnownDetector),
    File(PathBuf),
}

impl DetectorSpec {
    /// Built-ins first, then files; H1 and L1 when nothing is selected.
    pub fn collect(known: &[KnownDetector], files: &[PathBuf]) -> Vec<DetectorSpec> {
        let mut specs: Vec<DetectorSpec> = known.iter().copied().map(DetectorSpec::Known).collect();
        specs.extend(files.iter().cloned().map(DetectorSpec::File));
        if specs.is_empty() {
            specs = vec![
                DetectorSpec::Known(KnownDetector::H1),
                DetectorSpec::Known(KnownDetector::L1),
            ];
        }
        specs
    }
}

/// Pick the noise model for one detector.
///
/// An explicit curve file wins; then the detector's reference curve when requested
/// (built-in detectors only); otherwise the analytic design curve.
pub fn noise_model(config: &SimulationConfig, known: Option<KnownDetector>) -> Result<PowerSpectralDensity, DetectorError> {
    let library = CurveLibrary::new(config.curve_dir.clone());
    if let Some(source) = SpectralSource::from_options(config.asd_file.clone(), config.psd_file.clone()) {
        return PowerSpectralDensity::new(source, &library);
    }
    match known {
        Some(det) if config.reference_curve => PowerSpectralDensity::new(det.default_noise_curve(), &library),
        _ => {
            if config.reference_curve {
                log::warn!("no reference curve for a custom detector; using the design curve");
            }
            default_design_noise()
        }
    }
}

/// Build fresh interferometers for `specs`, each with its own noise model.
pub fn build_detectors(specs: &[DetectorSpec], config: &SimulationConfig) -> Result<Vec<Interferometer>, DetectorError> {
    specs
        .iter()
        .map(|spec| match spec {
            DetectorSpec::Known(det) => Ok(det.interferometer(noise_model(config, Some(*det))?)),
            DetectorSpec::File(path) => {
                let file = read_detector_json(path)?;
                Ok(file.into_interferometer(noise_model(config, None)?))
            }
        })
        .collect()
}

/// Fill each detector with a noise realisation (or zeros when `zero_noise`).
///
/// Detector `i` uses seed `seed + i` so that a seeded network run is reproducible
/// without identical noise in every detector.
pub fn fill_data(detectors: &mut [Interferometer], config: &SimulationConfig, zero_noise: bool) -> Result<(), DetectorError> {
    for (i, ifo) in detectors.iter_mut().enumerate() {
        let source = if zero_noise {
            let bins = frequency_series(config.sampling_frequency, config.duration)?.len();
            DataSource::FrequencyDomainStrain(vec![Complex64::new(0.0, 0.0); bins])
        } else {
            DataSource::NoiseRealisation {
                seed: config.seed.map(|s| s.wrapping_add(i as u64)),
            }
        };
        ifo.set_data(config.sampling_frequency, config.duration, source)?;
    }
    Ok(())
}

/// Inject `model` at `sky` (plus any extra physical parameters) into every detector
/// and return each detector's optimal SNR for the injected signal.
pub fn inject_all(
    detectors: &mut [Interferometer],
    model: &dyn WaveformModel,
    sky: &SkyPosition,
    extra: &Parameters,
    duration: f64,
) -> Result<Vec<(String, f64)>, DetectorError> {
    let mut parameters = sky.to_parameters();
    parameters.extend(extra.iter().map(|(k, v)| (k.clone(), *v)));

    let mut snrs = Vec::with_capacity(detectors.len());
    for ifo in detectors.iter_mut() {
        let polarizations = model.frequency_domain_strain(ifo.frequency_array(), &parameters)?;
        let signal = ifo.get_detector_response(&polarizations, &parameters)?;
        let snr = optimal_snr(&signal, &ifo.power_spectral_density_array(), duration);

        ifo.inject_signal(&polarizations, &parameters)?;
        log::info!("injected signal into {} (optimal SNR {snr:.2})", ifo.name());
        snrs.push((ifo.name().to_string(), snr));
    }
    Ok(snrs)
}

/// Antenna responses and geocenter delay of one detector.
#[derive(Debug, Clone)]
pub struct AntennaRow {
    pub detector: String,
    pub responses: Vec<(PolarizationMode, f64)>,
    pub time_delay: f64,
}

pub fn antenna_table(detectors: &[Interferometer], sky: &SkyPosition, modes: &[PolarizationMode]) -> Vec<AntennaRow> {
    detectors
        .iter()
        .map(|ifo| AntennaRow {
            detector: ifo.name().to_string(),
            responses: modes
                .iter()
                .map(|&mode| (mode, ifo.antenna_response(sky.ra, sky.dec, sky.geocent_time, sky.psi, mode)))
                .collect(),
            time_delay: ifo.time_delay_from_geocenter(sky.ra, sky.dec, sky.geocent_time),
        })
        .collect()
}

/// Grid of cell-centred sky positions, `ra` fastest.
pub fn sky_grid(nra: usize, ndec: usize) -> Result<Vec<(f64, f64)>, DetectorError> {
    if nra == 0 || ndec == 0 {
        return Err(DetectorError::InvalidGrid(format!(
            "sky map needs at least one cell per axis (got {nra} x {ndec})"
        )));
    }
    let dra = TAU / nra as f64;
    let ddec = PI / ndec as f64;
    Ok((0..ndec)
        .flat_map(|j| {
            let dec = -FRAC_PI_2 + (j as f64 + 0.5) * ddec;
            (0..nra).map(move |i| ((i as f64 + 0.5) * dra, dec))
        })
        .collect())
}

/// Antenna response of `detector_tensor` over the whole sky.
///
/// Takes the tensor by value so the evaluation can run in parallel without
/// touching the (single-threaded) interferometer cache.
pub fn sky_map(
    detector_tensor: Matrix3<f64>,
    time: f64,
    psi: f64,
    mode: PolarizationMode,
    nra: usize,
    ndec: usize,
) -> Result<Vec<SkyMapPoint>, DetectorError> {
    let grid = sky_grid(nra, ndec)?;
    Ok(grid
        .par_iter()
        .map(|&(ra, dec)| SkyMapPoint {
            ra,
            dec,
            response: antenna_response_for_tensor(&detector_tensor, ra, dec, time, psi, mode),
        })
        .collect())
}

/// `path` unchanged for a single detector, else `<stem>_<name>.<ext>`.
pub fn export_path_for(path: &Path, detector: &str, several: bool) -> PathBuf {
    if !several {
        return path.to_path_buf();
    }
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{detector}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{detector}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> SimulationConfig {
        SimulationConfig {
            sampling_frequency: 128.0,
            duration: 2.0,
            seed: Some(7),
            asd_file: None,
            psd_file: None,
            reference_curve: false,
            curve_dir: PathBuf::from("noise_curves"),
            plot: false,
            plot_width: 40,
            plot_height: 10,
            export: None,
        }
    }

    #[test]
    fn default_network_is_hanford_livingston() {
        let specs = DetectorSpec::collect(&[], &[]);
        let names: Vec<_> = build_detectors(&specs, &config())
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["H1", "L1"]);
    }

    #[test]
    fn missing_reference_curve_is_an_io_error() {
        let mut cfg = config();
        cfg.reference_curve = true;
        cfg.curve_dir = PathBuf::from("/definitely/not/a/curve/dir");
        let err = noise_model(&cfg, Some(KnownDetector::V1)).unwrap_err();
        assert!(matches!(err, DetectorError::Io { .. }));
    }

    #[test]
    fn seeded_network_noise_differs_per_detector() {
        let cfg = config();
        let mut dets = build_detectors(&DetectorSpec::collect(&[], &[]), &cfg).unwrap();
        fill_data(&mut dets, &cfg, false).unwrap();
        assert_ne!(dets[0].data(), dets[1].data());

        let mut again = build_detectors(&DetectorSpec::collect(&[], &[]), &cfg).unwrap();
        fill_data(&mut again, &cfg, false).unwrap();
        assert_eq!(dets[1].data(), again[1].data());
    }

    #[test]
    fn zero_background_injection_equals_the_response() {
        let cfg = config();
        let mut dets = build_detectors(&[DetectorSpec::Known(KnownDetector::V1)], &cfg).unwrap();
        fill_data(&mut dets, &cfg, true).unwrap();

        let model = |freqs: &[f64], params: &Parameters| -> Result<crate::domain::Polarizations, DetectorError> {
            let amp = 1e-21 / params["luminosity_distance"];
            Ok(crate::domain::Polarizations::from([
                (PolarizationMode::Plus, vec![Complex64::new(amp, 0.0); freqs.len()]),
                (PolarizationMode::Cross, vec![Complex64::new(0.0, amp); freqs.len()]),
            ]))
        };
        let sky = SkyPosition { ra: 1.0, dec: 0.2, geocent_time: 1e9, psi: 0.4 };
        let extra = Parameters::from([("luminosity_distance".to_string(), 2.0)]);
        let snrs = inject_all(&mut dets, &model, &sky, &extra, cfg.duration).unwrap();
        assert_eq!(snrs.len(), 1);
        assert!(snrs[0].1 > 0.0);

        let mut params = sky.to_parameters();
        params.extend(extra);
        let pols = model(dets[0].frequency_array(), &params).unwrap();
        let expected = dets[0].get_detector_response(&pols, &params).unwrap();
        assert_eq!(dets[0].data(), expected.as_slice());
    }

    #[test]
    fn injection_evaluates_the_model_once_per_detector() {
        let cfg = config();
        let mut dets = build_detectors(&DetectorSpec::collect(&[], &[]), &cfg).unwrap();
        fill_data(&mut dets, &cfg, true).unwrap();

        let calls = std::cell::Cell::new(0);
        let model = |freqs: &[f64], _: &Parameters| -> Result<crate::domain::Polarizations, DetectorError> {
            calls.set(calls.get() + 1);
            Ok(crate::domain::Polarizations::from([(
                PolarizationMode::Plus,
                vec![Complex64::new(1e-22, 0.0); freqs.len()],
            )]))
        };
        let sky = SkyPosition { ra: 0.5, dec: -0.3, geocent_time: 1e9, psi: 0.1 };
        inject_all(&mut dets, &model, &sky, &Parameters::new(), cfg.duration).unwrap();
        assert_eq!(calls.get(), dets.len());
    }

    #[test]
    fn sky_map_matches_the_serial_response() {
        let ifo = KnownDetector::H1.with_design_noise().unwrap();
        let map = sky_map(ifo.detector_tensor(), 1e9, 0.3, PolarizationMode::Cross, 8, 4).unwrap();
        assert_eq!(map.len(), 32);
        for p in &map {
            let serial = ifo.antenna_response(p.ra, p.dec, 1e9, 0.3, PolarizationMode::Cross);
            assert_relative_eq!(p.response, serial, epsilon = 1e-14);
            assert!(p.response.abs() <= 1.0 + 1e-12);
        }
        assert!(sky_map(ifo.detector_tensor(), 1e9, 0.0, PolarizationMode::Plus, 0, 4).is_err());
    }

    #[test]
    fn sky_grid_is_cell_centred() {
        let grid = sky_grid(4, 2).unwrap();
        assert_relative_eq!(grid[0].0, PI / 4.0);
        assert_relative_eq!(grid[0].1, -PI / 4.0);
        assert_relative_eq!(grid[7].1, PI / 4.0);
    }

    #[test]
    fn export_paths() {
        let p = Path::new("out/noise.csv");
        assert_eq!(export_path_for(p, "H1", false), PathBuf::from("out/noise.csv"));
        assert_eq!(export_path_for(p, "H1", true), PathBuf::from("out/noise_H1.csv"));
        assert_eq!(export_path_for(Path::new("noise"), "V1", true), PathBuf::from("noise_V1"));
    }
}
