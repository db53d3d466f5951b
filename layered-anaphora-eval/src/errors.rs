//! Error types for corpus export and scoring.
//!
//! Data inconsistencies in a corpus (gold offsets that match no token,
//! relations to unknown groups) are not errors; they are counted in
//! [`ErrorTally`](crate::ErrorTally). Everything here is environmental.

use std::path::PathBuf;

use layered_anaphora::AnaphoraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export target exists and is not a directory.
    #[error("provided path ({path}) is not a folder")]
    NotADirectory { path: PathBuf },

    /// The scorer could not be started or exited with a failure status.
    #[error("scorer failed for metric {metric}: {message}")]
    Scorer { metric: String, message: String },

    /// The scorer report did not have the expected shape.
    #[error("malformed scorer report: {message}")]
    Report { message: String },

    #[error(transparent)]
    Config(#[from] AnaphoraError),
}

impl EvalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EvalError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn report(message: impl Into<String>) -> Self {
        EvalError::Report {
            message: message.into(),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;
