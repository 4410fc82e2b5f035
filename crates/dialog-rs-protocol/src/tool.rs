use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure classes surfaced by the dialog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No record exists for the requested id.
    NotFound,
    /// A record with the same id is already stored.
    AlreadyExists,
    /// The id cannot name a record file.
    InvalidId,
    /// A record file could not be decoded.
    CorruptRecord,
    /// The storage root cannot be created or accessed.
    StorageUnavailable,
    /// A record or export target could not be written.
    WriteFailed,
    /// Any other filesystem failure.
    Io,
}

impl ErrorKind {
    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InvalidId => "invalid_id",
            ErrorKind::CorruptRecord => "corrupt_record",
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::WriteFailed => "write_failed",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by tools and resource readers.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool name was not found in registry.
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    /// Tool received invalid arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// Resource uri does not match any exposed resource.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    /// The dialog store rejected the operation.
    #[error("{kind}: {message}")]
    Dialog { kind: ErrorKind, message: String },
}

impl ToolError {
    /// Wire name used when the error is reported to a caller.
    pub fn kind_str(&self) -> &'static str {
        match self {
            ToolError::ToolNotFound(_) => "tool_not_found",
            ToolError::InvalidArguments(_) => "invalid_arguments",
            ToolError::ResourceNotFound(_) => "resource_not_found",
            ToolError::Dialog { kind, .. } => kind.as_str(),
        }
    }

    /// Whether the error reports a missing dialog record.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ToolError::Dialog {
                kind: ErrorKind::NotFound,
                ..
            }
        )
    }
}
