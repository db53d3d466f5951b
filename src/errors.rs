//! Error types for loading configuration.
//!
//! Grouping and resolution never fail: odd tags, empty inputs and missing
//! dependency heads are ordinary data. Only reading settings from disk can
//! go wrong.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnaphoraError {
    /// A configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for the expected settings.
    #[error("failed to parse {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type AnaphoraResult<T> = Result<T, AnaphoraError>;
