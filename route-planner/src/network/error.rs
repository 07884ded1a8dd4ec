//! Data loading error types.

use std::path::PathBuf;

use crate::spatial::GeoDataError;

/// Why a single data file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum FileErrorKind {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed record: {0}")]
    InvalidRecord(String),

    #[error("file name does not carry a service id")]
    NoServiceId,
}

/// A data file that was skipped, with the reason.
#[derive(Debug, thiserror::Error)]
#[error("{}: {kind}", file.display())]
pub struct FileError {
    pub file: PathBuf,
    pub kind: FileErrorKind,
}

impl FileError {
    pub fn new(file: impl Into<PathBuf>, kind: impl Into<FileErrorKind>) -> Self {
        Self {
            file: file.into(),
            kind: kind.into(),
        }
    }
}

/// Errors that abort loading as a whole.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A directory or required file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Every file of a required dataset failed (or there were none)
    #[error("no usable {dataset} files ({} failed)", failures.len())]
    NoUsableFiles {
        dataset: &'static str,
        failures: Vec<FileError>,
    },

    /// A GeoJSON input could not be interpreted
    #[error("{}: {source}", path.display())]
    GeoData {
        path: PathBuf,
        source: GeoDataError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FileError::new(
            "BUS/STOP/B3.json",
            FileErrorKind::InvalidRecord("direction key \"x\"".into()),
        );
        assert_eq!(
            err.to_string(),
            "BUS/STOP/B3.json: malformed record: direction key \"x\""
        );

        let err = FileError::new("BUS/STOP/notes.json", FileErrorKind::NoServiceId);
        assert_eq!(
            err.to_string(),
            "BUS/STOP/notes.json: file name does not carry a service id"
        );

        let err = LoadError::NoUsableFiles {
            dataset: "bus stop",
            failures: vec![err],
        };
        assert_eq!(err.to_string(), "no usable bus stop files (1 failed)");
    }
}
