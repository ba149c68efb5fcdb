//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds detectors and their noise models
//! - runs the requested simulation
//! - prints reports/plots
//! - writes optional exports

use std::fs::create_dir_all;

use clap::Parser;

use crate::cli::{AntennaArgs, Command, DetectorsArgs, InjectArgs, NoiseArgs, NoiseModelArgs, OutputArgs, SamplingArgs, SkymapArgs};
use crate::detector::{Interferometer, KnownDetector};
use crate::domain::{Parameters, PolarizationMode, SimulationConfig};
use crate::error::{AppError, DetectorError};
use crate::io::{CurveLibrary, DetectorFile, write_detector_json, write_frequency_series_csv, write_sky_map_csv};
use crate::waveform::TabulatedWaveform;

use self::pipeline::{DetectorSpec, build_detectors, export_path_for, fill_data};

pub mod pipeline;

/// Entry point for the `gwdet` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may set the curve library directory.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Detectors(args) => handle_detectors(args),
        Command::Antenna(args) => handle_antenna(args),
        Command::Noise(args) => handle_noise(args),
        Command::Inject(args) => handle_inject(args),
        Command::Skymap(args) => handle_skymap(args),
    }
}

fn handle_detectors(args: DetectorsArgs) -> Result<(), AppError> {
    let files: Vec<DetectorFile> = KnownDetector::ALL
        .iter()
        .map(|det| DetectorFile {
            name: det.name().to_string(),
            geometry: det.geometry(),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&files).map_err(DetectorError::from)?;
        println!("{json}");
    } else {
        let rows: Vec<_> = files.iter().map(|f| (f.name.clone(), f.geometry)).collect();
        println!("{}", crate::report::format_detector_table(&rows));
    }

    if let Some(dir) = &args.export_dir {
        create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", dir.display())))?;
        for file in &files {
            write_detector_json(&dir.join(format!("{}.json", file.name)), file)?;
        }
    }
    Ok(())
}

fn handle_antenna(args: AntennaArgs) -> Result<(), AppError> {
    let specs = DetectorSpec::collect(&args.detectors.detectors, &args.detectors.detector_files);
    let detectors = build_detectors(&specs, &SimulationConfig::default())?;

    let modes = if args.modes.is_empty() {
        vec![PolarizationMode::Plus, PolarizationMode::Cross]
    } else {
        args.modes.clone()
    };
    let sky = args.sky.sky_position();
    let rows = pipeline::antenna_table(&detectors, &sky, &modes);

    println!("{}", crate::report::format_antenna_table(&rows, &sky));
    Ok(())
}

fn handle_noise(args: NoiseArgs) -> Result<(), AppError> {
    let config = simulation_config(&args.noise, &args.sampling, &args.output);
    let specs = DetectorSpec::collect(&args.detectors.detectors, &args.detectors.detector_files);

    let mut detectors = build_detectors(&specs, &config)?;
    fill_data(&mut detectors, &config, false)?;

    print_data(&detectors, &config)?;
    Ok(())
}

fn handle_inject(args: InjectArgs) -> Result<(), AppError> {
    let config = simulation_config(&args.noise, &args.sampling, &args.output);
    let specs = DetectorSpec::collect(&args.detectors.detectors, &args.detectors.detector_files);

    let waveform = TabulatedWaveform::from_file(&args.waveform_file, args.reference_distance)?;
    let extra = Parameters::from([(
        "luminosity_distance".to_string(),
        args.distance.unwrap_or(args.reference_distance),
    )]);

    let mut detectors = build_detectors(&specs, &config)?;
    fill_data(&mut detectors, &config, args.zero_noise)?;

    let sky = args.sky.sky_position();
    let snrs = pipeline::inject_all(&mut detectors, &waveform, &sky, &extra, config.duration)?;

    println!("{}", crate::report::format_injection(&snrs, &sky));
    print_data(&detectors, &config)?;
    Ok(())
}

fn handle_skymap(args: SkymapArgs) -> Result<(), AppError> {
    let specs = DetectorSpec::collect(&args.detectors.detectors, &args.detectors.detector_files);
    let detectors = build_detectors(&specs, &SimulationConfig::default())?;
    let time = args.time.gps_time();
    let several = detectors.len() > 1;

    println!("=== gwdet - sky map ({} x {} cells, psi={:.4}) ===", args.nra, args.ndec, args.psi);
    for ifo in &detectors {
        let points = pipeline::sky_map(ifo.detector_tensor(), time, args.psi, args.mode, args.nra, args.ndec)?;
        if let Some(summary) = crate::report::summarize_sky_map(ifo.name(), args.mode, &points) {
            print!("{}", crate::report::format_sky_map_summary(&summary));
        }
        if let Some(path) = &args.export {
            write_sky_map_csv(&export_path_for(path, ifo.name(), several), &points)?;
        }
    }
    Ok(())
}

/// Summaries, plots and exports shared by `noise` and `inject`.
fn print_data(detectors: &[Interferometer], config: &SimulationConfig) -> Result<(), AppError> {
    let summaries: Vec<_> = detectors
        .iter()
        .map(|ifo| crate::report::summarize_data(ifo, config.duration))
        .collect();
    println!("{}", crate::report::format_data_summaries(&summaries, config));

    let several = detectors.len() > 1;
    for ifo in detectors {
        if config.plot {
            println!("{}:", ifo.name());
            println!("{}", spectrum_plot(ifo, config));
        }
        if let Some(path) = &config.export {
            write_frequency_series_csv(&export_path_for(path, ifo.name(), several), ifo)?;
        }
    }
    Ok(())
}

/// `|d|·sqrt(2/T)` as points against the ASD, both on the data grid.
fn spectrum_plot(ifo: &Interferometer, config: &SimulationConfig) -> String {
    let freqs = ifo.frequency_array();
    let scale = (2.0 / config.duration).sqrt();
    let curve: Vec<(f64, f64)> = freqs.iter().copied().zip(ifo.amplitude_spectral_density_array()).collect();
    let points: Vec<(f64, f64)> = freqs.iter().zip(ifo.data()).map(|(&f, d)| (f, d.norm() * scale)).collect();
    crate::plot::render_spectrum_plot(&curve, &points, config.plot_width, config.plot_height)
}

pub fn simulation_config(noise: &NoiseModelArgs, sampling: &SamplingArgs, output: &OutputArgs) -> SimulationConfig {
    let curve_dir = noise
        .curve_dir
        .clone()
        .unwrap_or_else(|| CurveLibrary::from_env().dir().to_path_buf());
    SimulationConfig {
        sampling_frequency: sampling.sampling_frequency,
        duration: sampling.duration,
        seed: sampling.seed,
        asd_file: noise.asd_file.clone(),
        psd_file: noise.psd_file.clone(),
        reference_curve: noise.reference_curve,
        curve_dir,
        plot: !output.no_plot,
        plot_width: output.width,
        plot_height: output.height,
        export: output.export.clone(),
    }
}
