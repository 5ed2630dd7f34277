//! Error types for port operations.

/// Persistence failures, with enough context to tell a full disk from a
/// hand-edited state file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Filesystem operation failed - includes the operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// The record could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The file on disk does not decode as a session record.
    #[error("Corrupt state file: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Create an Io error with operation context.
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn corrupt(message: impl ToString) -> Self {
        Self::Corrupt(message.to_string())
    }
}
