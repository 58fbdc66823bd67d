//! Classified failures of the upload pipeline.
//!
//! Each variant maps onto exactly one terminal [`UploadOutcome`], so callers
//! can use `?` inside a stage and still hand a structured value back to the
//! binary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{TransportCause, UploadOutcome};

#[derive(Debug, Error)]
pub enum UploadError {
    /// Bad input detected before any I/O or network activity.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The source file could not be read in full while digesting.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Network error or non-201 status.
    #[error("transport failed: {0}")]
    Transport(TransportCause),
}

impl UploadError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        UploadError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<UploadError> for UploadOutcome {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(reason) => UploadOutcome::ValidationFailure { reason },
            err @ UploadError::Io { .. } => UploadOutcome::IoFailure {
                reason: err.to_string(),
            },
            UploadError::Transport(cause) => UploadOutcome::TransportFailure { cause },
        }
    }
}
