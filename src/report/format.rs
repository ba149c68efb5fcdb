//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the detector/noise code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::AntennaRow;
use crate::domain::{DetectorGeometry, SimulationConfig, SkyPosition};
use crate::math::{gps_time_to_gmst, utc_from_gps_time};
use crate::report::{DataSummary, SkyMapSummary};

/// Table of detector geometries.
pub fn format_detector_table(detectors: &[(String, DetectorGeometry)]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:>10} {:>11} {:>9} {:>9} {:>9} {:>11} {:>11} {:>7}\n",
        "name", "lat[deg]", "lon[deg]", "elev[m]", "xaz[deg]", "yaz[deg]", "xtilt[rad]", "ytilt[rad]", "L[km]"
    ));
    for (name, g) in detectors {
        out.push_str(&format!(
            "{:<8} {:>10.5} {:>11.5} {:>9.3} {:>9.4} {:>9.4} {:>11.3e} {:>11.3e} {:>7.2}\n",
            name, g.latitude, g.longitude, g.elevation, g.xarm_azimuth, g.yarm_azimuth, g.xarm_tilt, g.yarm_tilt, g.length
        ));
    }
    out
}

fn format_sky(sky: &SkyPosition) -> String {
    format!(
        "Source: ra={:.4} dec={:.4} psi={:.4} rad | t_gps={:.3} ({} UTC) | gmst={:.4} rad\n",
        sky.ra,
        sky.dec,
        sky.psi,
        sky.geocent_time,
        utc_from_gps_time(sky.geocent_time)
            .map_or_else(|| "n/a".to_string(), |utc| utc.format("%Y-%m-%d %H:%M:%S").to_string()),
        gps_time_to_gmst(sky.geocent_time),
    )
}

/// Antenna responses per detector and mode, plus the delay from the geocenter.
pub fn format_antenna_table(rows: &[AntennaRow], sky: &SkyPosition) -> String {
    let mut out = String::new();
    out.push_str("=== gwdet - antenna response ===\n");
    out.push_str(&format_sky(sky));
    out.push('\n');

    let Some(first) = rows.first() else {
        return out;
    };
    out.push_str(&format!("{:<8}", "detector"));
    for (mode, _) in &first.responses {
        out.push_str(&format!(" {:>13}", format!("F_{mode}")));
    }
    out.push_str(&format!(" {:>12}\n", "dt[ms]"));

    for row in rows {
        out.push_str(&format!("{:<8}", row.detector));
        for (_, value) in &row.responses {
            out.push_str(&format!(" {value:>13.6}"));
        }
        out.push_str(&format!(" {:>12.4}\n", row.time_delay * 1e3));
    }
    out
}

/// Summary of simulated data for each detector.
pub fn format_data_summaries(summaries: &[DataSummary], config: &SimulationConfig) -> String {
    let mut out = String::new();
    out.push_str("=== gwdet - detector data ===\n");
    out.push_str(&format!(
        "Segment: fs={} Hz | T={} s | seed={}\n",
        config.sampling_frequency,
        config.duration,
        config.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string()),
    ));
    out.push_str(&format!("Noise: {}\n\n", noise_label(config)));

    out.push_str(&format!(
        "{:<8} {:>7} {:>9} {:>10} {:>12}\n",
        "detector", "bins", "df[Hz]", "fmax[Hz]", "|d|²/(S·T/2)"
    ));
    for s in summaries {
        out.push_str(&format!(
            "{:<8} {:>7} {:>9.4} {:>10.1} {:>12.4}\n",
            s.detector, s.bins, s.frequency_resolution, s.max_frequency, s.power_ratio
        ));
    }
    out
}

/// Optimal SNR per detector and the network SNR (quadrature sum).
pub fn format_injection(snrs: &[(String, f64)], sky: &SkyPosition) -> String {
    let mut out = String::new();
    out.push_str("=== gwdet - injection ===\n");
    out.push_str(&format_sky(sky));
    for (name, snr) in snrs {
        out.push_str(&format!("{name:<8} optimal SNR={snr:.3}\n"));
    }
    let network = snrs.iter().map(|(_, s)| s * s).sum::<f64>().sqrt();
    out.push_str(&format!("{:<8} optimal SNR={network:.3}\n", "network"));
    out
}

pub fn format_sky_map_summary(summary: &SkyMapSummary) -> String {
    format!(
        "{:<8} F_{}: max={:+.4} at (ra={:.3}, dec={:+.3}) | min={:+.4} at (ra={:.3}, dec={:+.3}) | rms={:.4}\n",
        summary.detector,
        summary.mode,
        summary.max.response,
        summary.max.ra,
        summary.max.dec,
        summary.min.response,
        summary.min.ra,
        summary.min.dec,
        summary.rms,
    )
}

fn noise_label(config: &SimulationConfig) -> String {
    if let Some(path) = &config.asd_file {
        format!("ASD file '{}'", path.display())
    } else if let Some(path) = &config.psd_file {
        format!("PSD file '{}'", path.display())
    } else if config.reference_curve {
        format!("reference curves in '{}'", config.curve_dir.display())
    } else {
        "Advanced LIGO design curve (analytic)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PolarizationMode;

    #[test]
    fn antenna_table_layout() {
        let rows = vec![AntennaRow {
            detector: "H1".to_string(),
            responses: vec![(PolarizationMode::Plus, 0.5), (PolarizationMode::Cross, -0.25)],
            time_delay: 0.0125,
        }];
        let sky = SkyPosition { ra: 1.0, dec: 0.5, geocent_time: 1_126_259_462.0, psi: 0.0 };
        let txt = format_antenna_table(&rows, &sky);
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[1].contains("2015-09-14 09:50:45 UTC"), "{}", lines[1]);
        assert_eq!(lines[3], "detector        F_plus       F_cross       dt[ms]");
        assert_eq!(lines[4], "H1            0.500000     -0.250000      12.5000");
    }

    #[test]
    fn network_snr_adds_in_quadrature() {
        let sky = SkyPosition { ra: 0.0, dec: 0.0, geocent_time: 1e9, psi: 0.0 };
        let txt = format_injection(&[("H1".to_string(), 3.0), ("L1".to_string(), 4.0)], &sky);
        assert!(txt.ends_with("network  optimal SNR=5.000\n"));
    }

    #[test]
    fn far_future_time_prints_without_a_calendar_date() {
        let sky = SkyPosition { ra: 0.3, dec: -0.2, geocent_time: 1e13, psi: 0.0 };
        let txt = format_antenna_table(&[], &sky);
        assert!(txt.lines().nth(1).unwrap().contains("(n/a UTC)"), "{txt}");
    }
}
