//! CSV exports of detector data and sky maps.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::detector::Interferometer;
use crate::domain::SkyMapPoint;
use crate::error::DetectorError;

/// Write a detector's frequency-domain data with its ASD on the same grid.
///
/// Columns: `frequency,real,imag,asd`.
pub fn write_frequency_series_csv(path: &Path, interferometer: &Interferometer) -> Result<(), DetectorError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["frequency", "real", "imag", "asd"])?;

    let asd = interferometer.amplitude_spectral_density_array();
    for ((f, d), a) in interferometer.frequency_array().iter().zip(interferometer.data()).zip(&asd) {
        wtr.write_record(&[
            format!("{f:.6}"),
            format!("{:.10e}", d.re),
            format!("{:.10e}", d.im),
            format!("{a:.10e}"),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a sky map. Columns: `ra,dec,response`.
pub fn write_sky_map_csv(path: &Path, points: &[SkyMapPoint]) -> Result<(), DetectorError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for point in points {
        wtr.serialize(point)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
