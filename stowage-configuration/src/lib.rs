#![doc = include_str!("../README.md")]

mod config;
mod error;
pub mod options;
pub mod plan;
pub mod profile;

pub use config::StoreConfig;
pub use error::LoadError;
pub use options::{CompressSetting, ExpiresSetting, FacadeOptions, LoggerSetting};
pub use plan::{PlannedComponent, StackPlan, plan};
pub use profile::Profile;

use stowage::{BoxStore, ConfigError};

/// Builds the store stack for backend `name` configured by `options`.
///
/// See [`plan`] for how the stack is derived.
pub async fn new(name: &str, options: FacadeOptions) -> Result<BoxStore, ConfigError> {
    plan(name, &options).build().await
}
