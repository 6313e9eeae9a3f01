use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::engine::EngineConfig;

/// Configuration for the user_directory module (`modules.user_directory`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDirectoryConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "default_status_filter")]
    pub status_filter: bool,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default = "default_departments")]
    pub departments: Vec<String>,
    /// Base URL of the remote users API.
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Artificial delay before `GET /api/users` answers; 0 disables it.
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

impl Default for UserDirectoryConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            status_filter: default_status_filter(),
            roles: default_roles(),
            departments: default_departments(),
            source_url: default_source_url(),
            request_timeout_ms: default_request_timeout_ms(),
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

impl UserDirectoryConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.items_per_page == 0 {
            anyhow::bail!("user_directory.items_per_page must be at least 1");
        }
        url::Url::parse(&self.source_url).map_err(|e| {
            anyhow::anyhow!("user_directory.source_url '{}' is invalid: {e}", self.source_url)
        })?;
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            items_per_page: self.items_per_page,
            status_filter: self.status_filter,
            roles: self.roles.clone(),
            departments: self.departments.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

fn default_items_per_page() -> usize {
    5
}

fn default_status_filter() -> bool {
    true
}

fn default_roles() -> Vec<String> {
    EngineConfig::default().roles
}

fn default_departments() -> Vec<String> {
    EngineConfig::default().departments
}

fn default_source_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_simulated_latency_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_fills_defaults() {
        let cfg: UserDirectoryConfig =
            serde_json::from_value(serde_json::json!({ "items_per_page": 10 })).unwrap();
        assert_eq!(cfg.items_per_page, 10);
        assert!(cfg.status_filter);
        assert_eq!(cfg.roles[0], "Admin");
        assert_eq!(cfg.departments.len(), 5);
        assert_eq!(cfg.simulated_latency(), Duration::from_millis(300));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn unknown_keys_rejected() {
        let res: Result<UserDirectoryConfig, _> =
            serde_json::from_value(serde_json::json!({ "page_size": 10 }));
        assert!(res.is_err());
    }

    #[test]
    fn validate_rejects_zero_page_size_and_bad_url() {
        let cfg = UserDirectoryConfig {
            items_per_page: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = UserDirectoryConfig {
            source_url: "not a url".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn engine_config_mirrors_section() {
        let cfg = UserDirectoryConfig {
            items_per_page: 7,
            status_filter: false,
            roles: vec!["Ops".into()],
            ..Default::default()
        };
        let engine = cfg.engine_config();
        assert_eq!(engine.items_per_page, 7);
        assert!(!engine.status_filter);
        assert_eq!(engine.roles, vec!["Ops".to_string()]);
    }
}
