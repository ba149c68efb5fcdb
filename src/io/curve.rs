//! Read numeric tables such as spectral-density curves.
//!
//! Curve files are plain numeric tables:
//! - one row per line, columns separated by whitespace and/or commas
//! - blank lines and lines starting with `#` or `%` are ignored
//! - column 0 is frequency (Hz, ascending), column 1 the amplitude or power value
//!
//! Bare file names (no directory component) are looked up in the bundled
//! reference-curve library, see `CurveLibrary`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DetectorError;

/// Environment variable naming the reference-curve directory.
pub const CURVE_DIR_ENV: &str = "GWDET_NOISE_CURVE_DIR";

/// Default reference-curve directory (relative to the working directory).
pub const DEFAULT_CURVE_DIR: &str = "noise_curves";

/// Location of the bundled reference noise curves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveLibrary {
    dir: PathBuf,
}

impl CurveLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Library directory from `GWDET_NOISE_CURVE_DIR`, else `noise_curves/`.
    ///
    /// Callers that want `.env` support should load it first (the binary does).
    pub fn from_env() -> Self {
        let dir = std::env::var_os(CURVE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CURVE_DIR));
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths with a directory component are used as given; bare names are
    /// resolved inside the library.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let has_dir = path.parent().is_some_and(|p| !p.as_os_str().is_empty());
        if has_dir || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }
}

/// Read a numeric table and return its first `columns` columns.
///
/// Rows with more columns are accepted (extra columns ignored); rows with fewer
/// are a parse error.
pub fn read_numeric_columns(path: &Path, columns: usize) -> Result<Vec<Vec<f64>>, DetectorError> {
    let text = fs::read_to_string(path).map_err(|source| DetectorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = vec![Vec::new(); columns];
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < columns {
            return Err(DetectorError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("expected {columns} columns, found {}", fields.len()),
            });
        }

        for (col, field) in fields.iter().take(columns).enumerate() {
            let value: f64 = field.parse().map_err(|e| DetectorError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("invalid number '{field}': {e}"),
            })?;
            out[col].push(value);
        }
    }

    log::debug!("read {} rows from '{}'", out.first().map_or(0, Vec::len), path.display());
    Ok(out)
}

/// Read a `(frequency, value)` curve.
pub fn read_two_column_curve(path: &Path) -> Result<(Vec<f64>, Vec<f64>), DetectorError> {
    let mut cols = read_numeric_columns(path, 2)?;
    let values = cols.pop().unwrap_or_default();
    let frequencies = cols.pop().unwrap_or_default();
    if frequencies.is_empty() {
        return Err(DetectorError::InvalidCurve(format!("'{}' contains no samples", path.display())));
    }
    Ok((frequencies, values))
}
