//! Profile store errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`StoreError::NotFound`] | `STORE_NOT_FOUND` | Yes |
//! | [`StoreError::Read`] | `STORE_READ_FAILED` | Yes |
//! | [`StoreError::Parse`] | `STORE_PARSE_FAILED` | Yes |
//! | [`StoreError::Unavailable`] | `STORE_UNAVAILABLE` | Yes |
//!
//! Every store error is local to the request that triggered the load;
//! the sequencer drops that request and moves on.

use applier_types::{ErrorCode, ProfileId};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to resolve a profile definition.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No definition exists for the ID.
    #[error("profile '{id}' not found (searched: {searched:?})")]
    NotFound {
        id: ProfileId,
        searched: Vec<PathBuf>,
    },

    /// The definition exists but could not be read.
    #[error("failed to read profile '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The definition is malformed.
    #[error("failed to parse profile '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// The store could not serve the request at all.
    #[error("profile store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(id: ProfileId, searched: Vec<PathBuf>) -> Self {
        Self::NotFound { id, searched }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "STORE_NOT_FOUND",
            Self::Read { .. } => "STORE_READ_FAILED",
            Self::Parse { .. } => "STORE_PARSE_FAILED",
            Self::Unavailable { .. } => "STORE_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}
