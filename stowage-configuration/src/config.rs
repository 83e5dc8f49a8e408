use serde::Deserialize;
use stowage::{BoxStore, ConfigError};

use crate::{FacadeOptions, LoadError, StackPlan, plan};

/// A complete facade configuration: the backend name plus its options.
///
/// ```yaml
/// backend: HashFile
/// dir: /var/cache/app
/// expires: 300
/// threadsafe: true
/// logger:
///   level: info
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreConfig {
    pub backend: String,
    #[serde(flatten)]
    pub options: FacadeOptions,
}

impl StoreConfig {
    pub fn from_yaml(source: &str) -> Result<Self, LoadError> {
        Ok(serde_saphyr::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    /// The stack this configuration describes.
    pub fn plan(&self) -> StackPlan {
        plan(&self.backend, &self.options)
    }

    pub async fn into_store(self) -> Result<BoxStore, ConfigError> {
        self.plan().build().await
    }
}
