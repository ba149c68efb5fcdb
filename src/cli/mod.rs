//! Command-line parsing for the `gwdet` detector simulator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the detector/noise code.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};

use crate::detector::KnownDetector;
use crate::domain::{PolarizationMode, SkyPosition};
use crate::math::gps_time_from_utc;

/// GPS time used when neither `--time` nor `--utc` is given (GW150914).
pub const DEFAULT_GPS_TIME: f64 = 1_126_259_462.4;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gwdet", version, about = "Gravitational-wave interferometer response and noise simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the built-in detectors and their geometry.
    Detectors(DetectorsArgs),
    /// Antenna-pattern responses and geocenter delays for one sky position.
    Antenna(AntennaArgs),
    /// Draw a noise realisation from each detector's PSD and summarise it.
    Noise(NoiseArgs),
    /// Inject a tabulated waveform into each detector's data.
    Inject(InjectArgs),
    /// Antenna-pattern map over the whole sky.
    Skymap(SkymapArgs),
}

#[derive(Debug, Args, Clone)]
pub struct DetectorsArgs {
    /// Print the geometry as detector JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Write each detector to `<DIR>/<name>.json`.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

/// Which detectors to simulate.
#[derive(Debug, Args, Clone)]
pub struct DetectorArgs {
    /// Built-in detector (repeatable): H1, L1, V1, GEO600.
    #[arg(short = 'd', long = "detector", value_enum, ignore_case = true)]
    pub detectors: Vec<KnownDetector>,

    /// Custom detector JSON file (repeatable).
    #[arg(long = "detector-file", value_name = "JSON")]
    pub detector_files: Vec<PathBuf>,
}

/// Where each detector's noise curve comes from.
///
/// Precedence: `--asd-file`, then `--psd-file`, then `--reference-curve`, then the
/// analytic Advanced LIGO design curve.
#[derive(Debug, Args, Clone)]
pub struct NoiseModelArgs {
    /// Amplitude spectral density file (frequency, strain/√Hz).
    #[arg(long, value_name = "FILE")]
    pub asd_file: Option<PathBuf>,

    /// Power spectral density file (frequency, strain²/Hz).
    #[arg(long, value_name = "FILE")]
    pub psd_file: Option<PathBuf>,

    /// Use each built-in detector's reference curve from the curve library.
    #[arg(long)]
    pub reference_curve: bool,

    /// Curve library directory (default: $GWDET_NOISE_CURVE_DIR, else `noise_curves`).
    #[arg(long, value_name = "DIR")]
    pub curve_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SamplingArgs {
    /// Sampling frequency in Hz.
    #[arg(short = 'f', long, default_value_t = 4096.0)]
    pub sampling_frequency: f64,

    /// Segment duration in seconds.
    #[arg(short = 't', long, default_value_t = 4.0)]
    pub duration: f64,

    /// Random seed for noise generation (OS entropy when omitted).
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export results to CSV. With several detectors the detector name is appended
    /// to the file stem.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Arrival time of the signal at the geocenter.
#[derive(Debug, Args, Clone)]
pub struct TimeArgs {
    /// GPS time in seconds.
    #[arg(long, conflicts_with = "utc")]
    pub time: Option<f64>,

    /// UTC time, e.g. `2015-09-14T09:50:45.4`.
    #[arg(long)]
    pub utc: Option<NaiveDateTime>,
}

impl TimeArgs {
    pub fn gps_time(&self) -> f64 {
        match (self.time, self.utc) {
            (Some(t), _) => t,
            (None, Some(utc)) => gps_time_from_utc(utc),
            (None, None) => DEFAULT_GPS_TIME,
        }
    }
}

/// Source direction and orientation. Angles in radians.
#[derive(Debug, Args, Clone)]
pub struct SkyArgs {
    /// Right ascension.
    #[arg(long, default_value_t = 1.375, allow_negative_numbers = true)]
    pub ra: f64,

    /// Declination.
    #[arg(long, default_value_t = -1.2108, allow_negative_numbers = true)]
    pub dec: f64,

    /// Polarization angle.
    #[arg(long, default_value_t = 2.659, allow_negative_numbers = true)]
    pub psi: f64,

    #[command(flatten)]
    pub time: TimeArgs,
}

impl SkyArgs {
    pub fn sky_position(&self) -> SkyPosition {
        SkyPosition {
            ra: self.ra,
            dec: self.dec,
            geocent_time: self.time.gps_time(),
            psi: self.psi,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct AntennaArgs {
    #[command(flatten)]
    pub detectors: DetectorArgs,

    #[command(flatten)]
    pub sky: SkyArgs,

    /// Polarization modes to evaluate (repeatable; default plus and cross).
    #[arg(short = 'm', long = "mode", value_enum)]
    pub modes: Vec<PolarizationMode>,
}

#[derive(Debug, Args, Clone)]
pub struct NoiseArgs {
    #[command(flatten)]
    pub detectors: DetectorArgs,

    #[command(flatten)]
    pub noise: NoiseModelArgs,

    #[command(flatten)]
    pub sampling: SamplingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct InjectArgs {
    #[command(flatten)]
    pub detectors: DetectorArgs,

    #[command(flatten)]
    pub noise: NoiseModelArgs,

    #[command(flatten)]
    pub sampling: SamplingArgs,

    #[command(flatten)]
    pub sky: SkyArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Waveform table with columns `re(h+) im(h+) re(h×) im(h×)`, one row per
    /// frequency bin of the segment.
    #[arg(long, value_name = "FILE")]
    pub waveform_file: PathBuf,

    /// Distance at which the table is tabulated (Mpc).
    #[arg(long, default_value_t = 100.0)]
    pub reference_distance: f64,

    /// Luminosity distance of the injected source (Mpc; default: the reference distance).
    #[arg(long)]
    pub distance: Option<f64>,

    /// Inject into an all-zero background instead of a noise realisation.
    #[arg(long)]
    pub zero_noise: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SkymapArgs {
    #[command(flatten)]
    pub detectors: DetectorArgs,

    #[command(flatten)]
    pub time: TimeArgs,

    /// Polarization angle (radians).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub psi: f64,

    /// Polarization mode to map.
    #[arg(short = 'm', long, value_enum, default_value_t = PolarizationMode::Plus)]
    pub mode: PolarizationMode,

    /// Number of right-ascension cells.
    #[arg(long, default_value_t = 72)]
    pub nra: usize,

    /// Number of declination cells.
    #[arg(long, default_value_t = 36)]
    pub ndec: usize,

    /// Export the map(s) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_detectors_and_modes() {
        let cli = Cli::parse_from([
            "gwdet", "antenna", "-d", "H1", "-d", "GEO600", "--mode", "plus", "--mode", "breathing", "--dec", "-0.5",
        ]);
        let Command::Antenna(args) = cli.command else {
            panic!("expected antenna");
        };
        assert_eq!(args.detectors.detectors, vec![KnownDetector::H1, KnownDetector::Geo600]);
        assert_eq!(args.modes, vec![PolarizationMode::Plus, PolarizationMode::Breathing]);
        assert_eq!(args.sky.dec, -0.5);
        assert_eq!(args.sky.time.gps_time(), DEFAULT_GPS_TIME);
    }

    #[test]
    fn utc_is_converted_to_gps() {
        let cli = Cli::parse_from(["gwdet", "skymap", "--utc", "2015-09-14T09:50:45"]);
        let Command::Skymap(args) = cli.command else {
            panic!("expected skymap");
        };
        assert_eq!(args.time.gps_time(), 1_126_259_462.0);
    }

    #[test]
    fn time_and_utc_conflict() {
        let res = Cli::try_parse_from(["gwdet", "skymap", "--time", "1", "--utc", "2015-09-14T09:50:45"]);
        assert!(res.is_err());
    }
}
