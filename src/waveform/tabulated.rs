//! Waveforms read from flat files.
//!
//! The file holds one row per frequency bin with four columns:
//! `re(h+) im(h+) re(h×) im(h×)`, tabulated for a source at `reference_distance`.
//! The content is rescaled by `reference_distance / luminosity_distance`.

use std::path::Path;

use num_complex::Complex64;

use crate::domain::{Parameters, PolarizationMode, Polarizations};
use crate::error::DetectorError;
use crate::io::read_numeric_columns;
use crate::waveform::WaveformModel;

#[derive(Debug, Clone)]
pub struct TabulatedWaveform {
    plus: Vec<Complex64>,
    cross: Vec<Complex64>,
    reference_distance: f64,
}

impl TabulatedWaveform {
    pub fn new(plus: Vec<Complex64>, cross: Vec<Complex64>, reference_distance: f64) -> Result<Self, DetectorError> {
        if plus.len() != cross.len() {
            return Err(DetectorError::LengthMismatch {
                expected: plus.len(),
                found: cross.len(),
            });
        }
        Ok(Self {
            plus,
            cross,
            reference_distance,
        })
    }

    pub fn from_file(path: &Path, reference_distance: f64) -> Result<Self, DetectorError> {
        let cols = read_numeric_columns(path, 4)?;
        let to_complex = |re: &[f64], im: &[f64]| -> Vec<Complex64> {
            re.iter().zip(im).map(|(&r, &i)| Complex64::new(r, i)).collect()
        };
        Self::new(
            to_complex(&cols[0], &cols[1]),
            to_complex(&cols[2], &cols[3]),
            reference_distance,
        )
    }

    pub fn len(&self) -> usize {
        self.plus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plus.is_empty()
    }
}

impl WaveformModel for TabulatedWaveform {
    fn frequency_domain_strain(
        &self,
        frequency_array: &[f64],
        parameters: &Parameters,
    ) -> Result<Polarizations, DetectorError> {
        if self.len() != frequency_array.len() {
            return Err(DetectorError::LengthMismatch {
                expected: frequency_array.len(),
                found: self.len(),
            });
        }
        let distance = parameters
            .get("luminosity_distance")
            .copied()
            .ok_or_else(|| DetectorError::MissingParameter("luminosity_distance".to_string()))?;
        let scale = self.reference_distance / distance;

        Ok(Polarizations::from([
            (PolarizationMode::Plus, self.plus.iter().map(|&h| h * scale).collect()),
            (PolarizationMode::Cross, self.cross.iter().map(|&h| h * scale).collect()),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scales_with_distance() {
        let one = Complex64::new(1.0, -2.0);
        let wf = TabulatedWaveform::new(vec![one; 3], vec![one * 2.0; 3], 10.0).unwrap();
        let params = Parameters::from([("luminosity_distance".to_string(), 20.0)]);
        let pols = wf.frequency_domain_strain(&[0.0, 1.0, 2.0], &params).unwrap();
        assert_eq!(pols[&PolarizationMode::Plus][0], one * 0.5);
        assert_eq!(pols[&PolarizationMode::Cross][2], one);
    }

    #[test]
    fn grid_must_match_the_table() {
        let wf = TabulatedWaveform::new(vec![Complex64::new(0.0, 0.0); 3], vec![Complex64::new(0.0, 0.0); 3], 1.0)
            .unwrap();
        let params = Parameters::from([("luminosity_distance".to_string(), 1.0)]);
        assert!(matches!(
            wf.frequency_domain_strain(&[0.0, 1.0], &params),
            Err(DetectorError::LengthMismatch { expected: 2, found: 3 })
        ));
        assert!(matches!(
            wf.frequency_domain_strain(&[0.0, 1.0, 2.0], &Parameters::new()),
            Err(DetectorError::MissingParameter(_))
        ));
    }

    #[test]
    fn reads_four_column_files() {
        let path = std::env::temp_dir().join(format!("gwdet_wf_{}.txt", std::process::id()));
        fs::write(&path, "1 2 3 4\n5 6 7 8\n").unwrap();
        let wf = TabulatedWaveform::from_file(&path, 1.0).unwrap();
        assert_eq!(wf.len(), 2);
        let params = Parameters::from([("luminosity_distance".to_string(), 1.0)]);
        let pols = wf.frequency_domain_strain(&[0.0, 1.0], &params).unwrap();
        assert_eq!(pols[&PolarizationMode::Cross][1], Complex64::new(7.0, 8.0));
        fs::remove_file(path).ok();
    }
}
