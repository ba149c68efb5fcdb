//! Built-in detectors.
//!
//! Geometry from LIGO-T980044-10 and gr-qc/0008066. Each call builds a fresh,
//! independently mutable `Interferometer`.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::detector::interferometer::Interferometer;
use crate::domain::DetectorGeometry;
use crate::error::DetectorError;
use crate::noise::{PowerSpectralDensity, SpectralSource, default_design_noise};

fn dms(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum KnownDetector {
    #[value(name = "H1")]
    H1,
    #[value(name = "L1")]
    L1,
    #[value(name = "V1")]
    V1,
    #[value(name = "GEO600")]
    #[serde(rename = "GEO600")]
    Geo600,
}

impl KnownDetector {
    pub const ALL: [KnownDetector; 4] = [KnownDetector::H1, KnownDetector::L1, KnownDetector::V1, KnownDetector::Geo600];

    pub fn name(self) -> &'static str {
        match self {
            KnownDetector::H1 => "H1",
            KnownDetector::L1 => "L1",
            KnownDetector::V1 => "V1",
            KnownDetector::Geo600 => "GEO600",
        }
    }

    pub fn geometry(self) -> DetectorGeometry {
        match self {
            KnownDetector::H1 => DetectorGeometry {
                length: 4.0,
                latitude: dms(46.0, 27.0, 18.528),
                longitude: -dms(119.0, 24.0, 27.5657),
                elevation: 142.554,
                xarm_azimuth: 125.9994,
                yarm_azimuth: 215.994,
                xarm_tilt: -6.195e-4,
                yarm_tilt: 1.25e-5,
            },
            KnownDetector::L1 => DetectorGeometry {
                length: 4.0,
                latitude: dms(30.0, 33.0, 46.4196),
                longitude: -dms(90.0, 46.0, 27.2654),
                elevation: -6.574,
                xarm_azimuth: 197.7165,
                yarm_azimuth: 287.7165,
                xarm_tilt: -3.121e-4,
                yarm_tilt: -6.107e-4,
            },
            KnownDetector::V1 => DetectorGeometry {
                length: 3.0,
                latitude: dms(43.0, 37.0, 53.0921),
                longitude: dms(10.0, 30.0, 16.1878),
                elevation: 51.884,
                xarm_azimuth: 70.5674,
                yarm_azimuth: 160.5674,
                xarm_tilt: 0.0,
                yarm_tilt: 0.0,
            },
            KnownDetector::Geo600 => DetectorGeometry {
                length: 0.6,
                latitude: dms(52.0, 14.0, 42.528),
                longitude: dms(9.0, 48.0, 25.894),
                elevation: 114.425,
                xarm_azimuth: 115.9431,
                yarm_azimuth: 21.6117,
                xarm_tilt: 0.0,
                yarm_tilt: 0.0,
            },
        }
    }

    /// Reference sensitivity curve, named relative to the curve library.
    pub fn default_noise_curve(self) -> SpectralSource {
        match self {
            KnownDetector::H1 | KnownDetector::L1 => SpectralSource::PowerFile("aLIGO_ZERO_DET_high_P_psd.txt".into()),
            KnownDetector::V1 => SpectralSource::PowerFile("AdV_psd.txt".into()),
            KnownDetector::Geo600 => SpectralSource::AmplitudeFile("GEO600_S6e_asd.txt".into()),
        }
    }

    pub fn interferometer(self, power_spectral_density: PowerSpectralDensity) -> Interferometer {
        Interferometer::new(self.name(), self.geometry(), power_spectral_density)
    }

    /// Build the detector with the analytic Advanced LIGO design curve.
    pub fn with_design_noise(self) -> Result<Interferometer, DetectorError> {
        let psd = default_design_noise()?;
        Ok(self.interferometer(psd))
    }
}

impl fmt::Display for KnownDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownDetector {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        KnownDetector::ALL
            .into_iter()
            .find(|d| {
                d.name().eq_ignore_ascii_case(wanted) || (*d == KnownDetector::Geo600 && wanted.eq_ignore_ascii_case("geo"))
            })
            .ok_or_else(|| DetectorError::UnknownDetector(s.to_string()))
    }
}

/// Fresh instance of the detector called `name` (case-insensitive).
pub fn known_detector(name: &str, power_spectral_density: PowerSpectralDensity) -> Result<Interferometer, DetectorError> {
    Ok(name.parse::<KnownDetector>()?.interferometer(power_spectral_density))
}
