//! Where the active mapping comes from.
//!
//! Priority, highest first: bytes supplied by the embedding application, a
//! file named by [`MAPPING_PATH_ENV`], the built-in default. A tier that is
//! missing or fails to load is skipped with a warning; resolution itself
//! never fails.

use crate::mapping::InputMapping;
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable naming a JSON mapping file.
pub const MAPPING_PATH_ENV: &str = "INPUT_MAPPING_PATH";

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub mapping_bytes: Option<Vec<u8>>,
    pub mapping_path: Option<PathBuf>,
}

/// Which tier produced the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOrigin {
    Bytes,
    File(PathBuf),
    BuiltIn,
}

#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    pub mapping: InputMapping,
    pub origin: MappingOrigin,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the mapping path from the environment. An empty value counts as unset.
    pub fn from_env() -> Self {
        let mapping_path = std::env::var_os(MAPPING_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            mapping_bytes: None,
            mapping_path,
        }
    }

    #[must_use]
    pub fn with_mapping_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.mapping_bytes = Some(bytes.into());
        self
    }

    #[must_use]
    pub fn with_mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_path = Some(path.into());
        self
    }

    pub fn resolve_mapping(&self) -> ResolvedMapping {
        if let Some(bytes) = self.mapping_bytes.as_deref().filter(|b| !b.is_empty()) {
            match InputMapping::from_bytes(bytes) {
                Ok(mapping) => {
                    info!("Loaded custom input mapping from embedded bytes");
                    return ResolvedMapping {
                        mapping,
                        origin: MappingOrigin::Bytes,
                    };
                }
                Err(error) => {
                    warn!(%error, "Failed to load input mapping from bytes, trying file path");
                }
            }
        }

        if let Some(path) = &self.mapping_path {
            match InputMapping::from_file(path) {
                Ok(mapping) => {
                    info!(path = %path.display(), "Loaded custom input mapping from file");
                    return ResolvedMapping {
                        mapping,
                        origin: MappingOrigin::File(path.clone()),
                    };
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "Failed to load input mapping file, using default");
                }
            }
        }

        ResolvedMapping {
            mapping: InputMapping::default(),
            origin: MappingOrigin::BuiltIn,
        }
    }
}
