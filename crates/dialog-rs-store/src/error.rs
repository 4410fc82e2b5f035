//! Error types for dialog storage operations.

use crate::codec::CodecError;
use dialog_rs_protocol::{ErrorKind, ToolError};
use std::path::PathBuf;

/// Errors returned by the dialog store and query engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record file exists for the id.
    #[error("dialog {0} not found")]
    NotFound(String),
    /// A record file already exists for the id.
    #[error("dialog {0} already exists")]
    AlreadyExists(String),
    /// The id cannot be used as a file stem.
    #[error("invalid dialog id: {0:?}")]
    InvalidId(String),
    /// A record file exists but cannot be decoded.
    #[error("corrupt dialog record {}: {source}", .path.display())]
    CorruptRecord {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
    /// The storage root cannot be created or accessed.
    #[error("storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A record or export target could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Failure class reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            StoreError::InvalidId(_) => ErrorKind::InvalidId,
            StoreError::CorruptRecord { .. } => ErrorKind::CorruptRecord,
            StoreError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
            StoreError::WriteFailed { .. } => ErrorKind::WriteFailed,
            StoreError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        ToolError::Dialog {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
