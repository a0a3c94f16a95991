//! Storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Conversation storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which backend holds conversation state
    #[serde(default)]
    pub backend: StorageBackend,

    /// Base directory for the file backend
    #[serde(default = "default_path")]
    pub path: String,
}

/// Available storage backends
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map; state is lost on restart
    #[default]
    Memory,

    /// One YAML file per conversation under `path`
    File,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.path.trim().is_empty() {
            return Err(ValidationError::MissingRequired("storage.path"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "./data/conversations".to_string()
}
