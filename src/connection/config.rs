//! Hub Configuration
//!
//! Backend service addresses and client preferences, persisted as TOML.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::domain::parameter::ObjectParsePolicy;
use crate::error::Result;
use crate::helpers::get_or_create_config_dir;

/// Configuration file name inside the config directory
pub const CONFIG_FILE: &str = "config-hub.toml";

/// The four backend services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    Users,
    Configs,
    Visualizations,
    Valuations,
}

impl Service {
    pub fn label(&self) -> &'static str {
        match self {
            Service::Users => "users",
            Service::Configs => "configs",
            Service::Visualizations => "visualizations",
            Service::Valuations => "valuations",
        }
    }

    pub fn all() -> [Service; 4] {
        [
            Service::Users,
            Service::Configs,
            Service::Visualizations,
            Service::Valuations,
        ]
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Base URL of each backend service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub users: String,
    pub configs: String,
    pub visualizations: String,
    pub valuations: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            users: "http://localhost:8001".to_string(),
            configs: "http://localhost:8002".to_string(),
            visualizations: "http://localhost:8003".to_string(),
            valuations: "http://localhost:8004".to_string(),
        }
    }
}

impl ServiceEndpoints {
    /// Base URL without a trailing slash
    pub fn base(&self, service: Service) -> &str {
        let url = match service {
            Service::Users => &self.users,
            Service::Configs => &self.configs,
            Service::Visualizations => &self.visualizations,
            Service::Valuations => &self.valuations,
        };
        url.trim_end_matches('/')
    }

    /// Join a path onto a service base
    pub fn url(&self, service: Service, path: &str) -> String {
        format!("{}/{}", self.base(service), path.trim_start_matches('/'))
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub services: ServiceEndpoints,
    /// `en` or `it`; the system locale is used when unset
    pub locale: Option<String>,
    pub request_timeout_secs: u64,
    pub object_parse_policy: ObjectParsePolicy,
    /// Web front end used for share links
    pub share_base_url: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            services: ServiceEndpoints::default(),
            locale: None,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            object_parse_policy: ObjectParsePolicy::default(),
            share_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Get or create the default configuration file path
pub fn default_config_path() -> Result<PathBuf> {
    let path = get_or_create_config_dir()?.join(CONFIG_FILE);

    #[cfg(debug_assertions)]
    info!("Config file: {}", path.display());

    if !path.exists() {
        std::fs::write(&path, "")?;
    }
    Ok(path)
}

/// Load configuration from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<HubConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        return Ok(HubConfig::default());
    }

    let value = std::fs::read_to_string(&path)?;
    if value.trim().is_empty() {
        return Ok(HubConfig::default());
    }

    let config: HubConfig = toml::from_str(&value).map_err(|e| {
        error!(error = %e, path = ?path, "Failed to parse config file");
        e
    })?;
    Ok(config)
}

/// Write configuration to `path`
pub fn save_config(path: &Path, config: &HubConfig) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    info!(path = ?path, "Configuration saved");
    Ok(())
}
