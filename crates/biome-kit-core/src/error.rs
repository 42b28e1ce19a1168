//! Error types and handling for biome-kit operations

use std::path::PathBuf;
use thiserror::Error;

/// Two tools claim ownership of the same responsibility.
///
/// Raised during pre-synthesis validation. The messages are fixed so callers
/// (and tests) can match on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// Eslint is registered while the Biome linter is enabled
    #[error("Biome linter should not be used together with Eslint")]
    Linter,

    /// Prettier is registered while the Biome formatter or import organizer is enabled
    #[error("Biome formatter should not be used together with Prettier")]
    Formatter,
}

/// Main error type for biome-kit operations
#[derive(Debug, Error)]
pub enum BiomeKitError {
    /// Conflicting tool combination detected before synthesis
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Task registration or execution errors
    #[error("Task error in '{task}': {message}")]
    TaskError { task: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    Config,
    Task,
    Io,
    Json,
}

impl BiomeKitError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BiomeKitError::Conflict(_) => ErrorKind::Conflict,
            BiomeKitError::ConfigError { .. } => ErrorKind::Config,
            BiomeKitError::TaskError { .. } => ErrorKind::Task,
            BiomeKitError::IoError { .. } => ErrorKind::Io,
            BiomeKitError::JsonError(_) => ErrorKind::Json,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a task error
    pub fn task_error(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskError {
            task: task.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for BiomeKitError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_messages_are_fixed() {
        assert_eq!(
            ConflictError::Linter.to_string(),
            "Biome linter should not be used together with Eslint"
        );
        assert_eq!(
            ConflictError::Formatter.to_string(),
            "Biome formatter should not be used together with Prettier"
        );
    }

    #[test]
    fn test_conflict_wraps_transparently() {
        let err = BiomeKitError::from(ConflictError::Linter);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            err.to_string(),
            "Biome linter should not be used together with Eslint"
        );
    }
}
