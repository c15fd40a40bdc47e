//! Error types for ledger operations

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("not a valid date spec: '{0}'")]
    InvalidDate(String),

    #[error("not a valid time spec: '{0}'")]
    InvalidDuration(String),

    #[error("invalid project name: '{0}' (must be non-empty, without whitespace)")]
    InvalidProject(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} does not exist yet, so there is no last write to measure from", .0.display())]
    NoLedger(PathBuf),

    #[error("{0} falls outside the years 0000-9999")]
    OutOfRange(String),

    #[error("cannot resolve period '{period}': {reason}")]
    RangeResolution { period: String, reason: String },

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl TrackError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        TrackError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Malformed date or duration input
    pub fn is_parse(&self) -> bool {
        matches!(self, TrackError::InvalidDate(_) | TrackError::InvalidDuration(_))
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
