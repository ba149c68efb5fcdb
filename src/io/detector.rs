//! Read/write detector JSON files.
//!
//! A detector file describes a custom interferometer:
//!
//! ```json
//! { "name": "K1", "geometry": { "length": 3.0, "latitude": 36.41, ... } }
//! ```
//!
//! Angles are in degrees except the arm tilts (radians, optional). The noise model
//! is chosen separately on the command line.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detector::Interferometer;
use crate::domain::DetectorGeometry;
use crate::error::DetectorError;
use crate::noise::PowerSpectralDensity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorFile {
    pub name: String,
    pub geometry: DetectorGeometry,
}

impl DetectorFile {
    pub fn from_interferometer(interferometer: &Interferometer) -> Self {
        Self {
            name: interferometer.name().to_string(),
            geometry: interferometer.geometry(),
        }
    }

    pub fn into_interferometer(self, power_spectral_density: PowerSpectralDensity) -> Interferometer {
        Interferometer::new(self.name, self.geometry, power_spectral_density)
    }
}

pub fn write_detector_json(path: &Path, detector: &DetectorFile) -> Result<(), DetectorError> {
    let file = File::create(path).map_err(|source| DetectorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(file, detector)?;
    Ok(())
}

pub fn read_detector_json(path: &Path) -> Result<DetectorFile, DetectorError> {
    let file = File::open(path).map_err(|source| DetectorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let detector: DetectorFile = serde_json::from_reader(file)?;
    log::debug!("loaded detector '{}' from '{}'", detector.name, path.display());
    Ok(detector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::KnownDetector;
    use std::fs;

    #[test]
    fn tilts_default_to_zero() {
        let json = r#"{"name":"K1","geometry":{"length":3.0,"latitude":36.41,"longitude":137.31,
            "elevation":414.181,"xarm_azimuth":19.0,"yarm_azimuth":109.0}}"#;
        let detector: DetectorFile = serde_json::from_str(json).unwrap();
        assert_eq!(detector.name, "K1");
        assert_eq!(detector.geometry.xarm_tilt, 0.0);
        assert_eq!(detector.geometry.yarm_azimuth, 109.0);
    }

    #[test]
    fn written_file_rebuilds_the_same_detector() {
        let ifo = KnownDetector::V1.with_design_noise().unwrap();
        let path = std::env::temp_dir().join(format!("gwdet_{}_v1.json", std::process::id()));
        write_detector_json(&path, &DetectorFile::from_interferometer(&ifo)).unwrap();

        let rebuilt = read_detector_json(&path)
            .unwrap()
            .into_interferometer(ifo.power_spectral_density().clone());
        assert_eq!(rebuilt.name(), "V1");
        approx::assert_relative_eq!(rebuilt.detector_tensor(), ifo.detector_tensor(), epsilon = 1e-12);
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_detector_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, DetectorError::Io { .. }));
    }
}
