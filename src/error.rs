use std::path::PathBuf;

/// Errors raised by the detector and noise-model library.
///
/// Every variant is fatal to the call that produced it; nothing is mutated
/// before the error is returned.
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error("No method to set data provided: supply a frequency-domain strain or request a noise realisation")]
    NoDataSource,
    #[error("Missing required parameter `{0}`")]
    MissingParameter(String),
    #[error("Not a recognized arm: `{0}` (expected `x` or `y`)")]
    UnknownArm(String),
    #[error("Unknown polarization mode `{0}`")]
    UnknownMode(String),
    #[error("Unknown detector `{0}` (known: H1, L1, V1, GEO600)")]
    UnknownDetector(String),
    #[error("Array length mismatch: expected {expected} samples, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("Invalid frequency grid: {0}")]
    InvalidGrid(String),
    #[error("Invalid spectral density curve: {0}")]
    InvalidCurve(String),
    #[error("Failed to parse '{}' line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid detector JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DetectorError {
    /// Process exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            DetectorError::LengthMismatch { .. } => 4,
            _ => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DetectorError> for AppError {
    fn from(err: DetectorError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_errors_map_to_exit_codes() {
        let app: AppError = DetectorError::NoDataSource.into();
        assert_eq!(app.exit_code(), 2);
        assert!(app.to_string().contains("No method to set data"));

        let app: AppError = DetectorError::LengthMismatch { expected: 3, found: 2 }.into();
        assert_eq!(app.exit_code(), 4);
    }
}
