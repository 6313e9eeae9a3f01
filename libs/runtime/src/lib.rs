//! Process-level plumbing shared by the dashboard binaries: layered
//! configuration, home directory resolution and logging setup.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, LoggingConfig, Section, ServerConfig};
pub use paths::home_dir::{resolve_home_dir, HomeDirError};

use serde::de::DeserializeOwned;

/// Read-only access to the per-module configuration bag.
#[derive(Debug, Clone)]
pub struct AppConfigProvider {
    config: AppConfig,
}

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Raw JSON value stored under `modules.<module_name>`, if any.
    pub fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.config.modules.get(module_name)
    }

    /// Typed module config. A missing section yields `T::default()`;
    /// a present but malformed section is an error.
    pub fn module_config<T>(&self, module_name: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.get_module_config(module_name) {
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                anyhow::anyhow!("Invalid configuration for module '{module_name}': {e}")
            }),
            None => Ok(T::default()),
        }
    }
}
