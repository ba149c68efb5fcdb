//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the detector and noise engines
//! - parsed from CLI flags (`clap::ValueEnum`)
//! - loaded from / saved to JSON detector files

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::DetectorError;

/// Physical parameters keyed by name (`ra`, `dec`, `geocent_time`, `psi`, ...).
pub type Parameters = BTreeMap<String, f64>;

/// Frequency-domain content per polarization mode, aligned with a frequency grid.
pub type Polarizations = BTreeMap<PolarizationMode, Vec<Complex64>>;

/// Gravitational-wave polarization modes.
///
/// General relativity only produces `plus` and `cross`; the remaining four are the
/// scalar and vector modes of alternative theories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolarizationMode {
    Plus,
    Cross,
    Breathing,
    Longitudinal,
    X,
    Y,
}

impl PolarizationMode {
    pub const ALL: [PolarizationMode; 6] = [
        PolarizationMode::Plus,
        PolarizationMode::Cross,
        PolarizationMode::Breathing,
        PolarizationMode::Longitudinal,
        PolarizationMode::X,
        PolarizationMode::Y,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PolarizationMode::Plus => "plus",
            PolarizationMode::Cross => "cross",
            PolarizationMode::Breathing => "breathing",
            PolarizationMode::Longitudinal => "longitudinal",
            PolarizationMode::X => "x",
            PolarizationMode::Y => "y",
        }
    }
}

impl fmt::Display for PolarizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolarizationMode {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolarizationMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DetectorError::UnknownMode(s.to_string()))
    }
}

/// One of the two interferometer arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arm {
    X,
    Y,
}

impl FromStr for Arm {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Arm::X),
            "y" | "Y" => Ok(Arm::Y),
            other => Err(DetectorError::UnknownArm(other.to_string())),
        }
    }
}

/// Sky location, arrival time and orientation of an incoming signal.
///
/// Angles are in radians; `geocent_time` is GPS seconds at the geocenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    pub ra: f64,
    pub dec: f64,
    pub geocent_time: f64,
    pub psi: f64,
}

impl SkyPosition {
    pub const KEYS: [&'static str; 4] = ["ra", "dec", "geocent_time", "psi"];

    /// Pull the required keys out of a parameter map.
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, DetectorError> {
        let get = |key: &str| {
            parameters
                .get(key)
                .copied()
                .ok_or_else(|| DetectorError::MissingParameter(key.to_string()))
        };
        Ok(Self {
            ra: get("ra")?,
            dec: get("dec")?,
            geocent_time: get("geocent_time")?,
            psi: get("psi")?,
        })
    }

    pub fn to_parameters(self) -> Parameters {
        Parameters::from([
            ("ra".to_string(), self.ra),
            ("dec".to_string(), self.dec),
            ("geocent_time".to_string(), self.geocent_time),
            ("psi".to_string(), self.psi),
        ])
    }
}

/// Physical layout of a detector as stored in JSON detector files.
///
/// Latitude, longitude and arm azimuths are in degrees (azimuth measured North of
/// East); tilts are in radians above the local horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorGeometry {
    /// Arm length in kilometres.
    pub length: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Height above the reference ellipsoid in metres.
    pub elevation: f64,
    pub xarm_azimuth: f64,
    pub yarm_azimuth: f64,
    #[serde(default)]
    pub xarm_tilt: f64,
    #[serde(default)]
    pub yarm_tilt: f64,
}

/// One cell of an antenna-pattern sky map. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyMapPoint {
    pub ra: f64,
    pub dec: f64,
    pub response: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and the environment).
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub sampling_frequency: f64,
    pub duration: f64,
    /// Seed for noise generation; `None` draws from OS entropy.
    pub seed: Option<u64>,

    pub asd_file: Option<PathBuf>,
    pub psd_file: Option<PathBuf>,
    /// Use each known detector's reference curve from the curve library.
    pub reference_curve: bool,
    /// Directory of bundled reference curves.
    pub curve_dir: PathBuf,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sampling_frequency: 4096.0,
            duration: 4.0,
            seed: None,
            asd_file: None,
            psd_file: None,
            reference_curve: false,
            curve_dir: PathBuf::from("noise_curves"),
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_position_requires_every_key() {
        let mut params = Parameters::from([
            ("ra".to_string(), 1.0),
            ("dec".to_string(), -0.5),
            ("geocent_time".to_string(), 1126259462.0),
        ]);
        match SkyPosition::from_parameters(&params) {
            Err(DetectorError::MissingParameter(key)) => assert_eq!(key, "psi"),
            other => panic!("expected missing psi, got {other:?}"),
        }

        params.insert("psi".to_string(), 0.3);
        let sky = SkyPosition::from_parameters(&params).unwrap();
        assert_eq!(sky.psi, 0.3);
        assert_eq!(sky.to_parameters(), params);
    }

    #[test]
    fn arm_and_mode_parsing() {
        assert_eq!("x".parse::<Arm>().unwrap(), Arm::X);
        assert!(matches!("z".parse::<Arm>(), Err(DetectorError::UnknownArm(_))));
        assert_eq!("Cross".parse::<PolarizationMode>().unwrap(), PolarizationMode::Cross);
        assert!(matches!(
            "vector".parse::<PolarizationMode>(),
            Err(DetectorError::UnknownMode(_))
        ));
    }
}
