//! Error types for type generation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a schema into type declarations
#[derive(Debug, Error)]
pub enum TypegenError {
    /// Reading the schema or writing the output failed
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema document is not valid JSON
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The schema uses something the compiler cannot translate
    #[error("Schema compilation failed: {message}")]
    Compile { message: String },

    /// A rewrite rule pattern does not compile
    #[error("Invalid rewrite pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl TypegenError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile {
            message: message.into(),
        }
    }
}

/// Result type for type generation
pub type Result<T> = std::result::Result<T, TypegenError>;
