//! Client configuration, read from a TOML file.

use err_derive::Error;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const CONFIG_DIR_NAME: &str = "judge-portal";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(display = "Cannot read config file {:?}: {}", _0, _1)]
    Read(PathBuf, #[error(source, no_from)] std::io::Error),

    #[error(display = "Malformed config file: {}", _0)]
    Toml(#[error(source)] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortalConfig {
    /// Backend host, including port if needed.
    pub host: String,
    pub ssl: bool,
    /// Path prefix prepended to every endpoint, e.g. `/api`.
    pub api_prefix: String,
    /// The signed-in user's id, used by profile and submission queries.
    pub uid: Option<String>,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Stop polling once the submission reaches a final verdict.
    pub stop_on_final_verdict: bool,
    pub ingest: IngestConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            host: "localhost:5001".into(),
            ssl: false,
            api_prefix: String::new(),
            uid: None,
            poll_interval_secs: 5,
            request_timeout_secs: 10,
            stop_on_final_verdict: false,
            ingest: IngestConfig::default(),
        }
    }
}

impl PortalConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!(
            "{}://{}{}",
            scheme,
            self.host,
            self.api_prefix.trim_end_matches('/')
        )
    }

    /// The default config location, `<config_dir>/judge-portal/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_toml(s: &str) -> Result<PortalConfig, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load config from `path`, or from the default location if `path` is
    /// `None`. A missing default file yields the default config; a missing
    /// explicit file is an error.
    pub async fn load(path: Option<&Path>) -> Result<PortalConfig, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_owned(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(PortalConfig::default()),
            },
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(s) => {
                tracing::debug!("Loaded config from {}", path.display());
                Self::from_toml(&s)
            }
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(PortalConfig::default())
            }
            Err(e) => Err(ConfigError::Read(path, e)),
        }
    }
}

/// Rules deciding which dropped files are accepted into an ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// Files larger than this many bytes are rejected.
    pub max_file_size: u64,
    /// Extensions (without the dot, case-insensitive) that are rejected.
    pub reject_extensions: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            max_file_size: 64 * 1024 * 1024,
            reject_extensions: ["zip", "tar", "gz", "tgz", "7z", "rar", "exe", "dll", "so", "dylib"]
                .iter()
                .map(|&s| s.into())
                .collect(),
        }
    }
}
