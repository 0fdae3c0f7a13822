//! Error types for the input engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned to the code that loads mappings or registers combos.
///
/// Nothing in the per-frame poll path returns an error: unmapped input simply
/// produces no event.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Mapping parse error: {0}")]
    MappingParseError(#[from] serde_json::Error),

    #[error("IO error on {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown virtual button ordinal: {0}")]
    UnknownButton(u8),
}

/// Result type alias for input engine operations
pub type Result<T> = std::result::Result<T, InputError>;
