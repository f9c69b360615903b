//! Process configuration: CLI flags, webhook environment and the sites file.

use clap::Parser;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{SiteList, SitesFile};

pub const WEBHOOK_ENV: &str = "SLACK_WEBHOOK";

const MISSING_WEBHOOK_HELP: &str = r#"
The environment variable "SLACK_WEBHOOK" does not exist.
Please add the slack webhook environment variable to use this software.

export SLACK_WEBHOOK=https://hooks.slack.com/services/XXXXXXXXX/XXXXXXXXX/XXXXXXXXXXXXXXXXXXXXXXXX
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}", MISSING_WEBHOOK_HELP)]
    MissingWebhook,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {} as JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse {} as YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse {} as TOML: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SitesFormat {
    Json,
    Yaml,
    Toml,
}

impl SitesFormat {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => SitesFormat::Yaml,
            Some("toml") => SitesFormat::Toml,
            _ => SitesFormat::Json,
        }
    }
}

/// Watches HTTP endpoints and reports state changes to Slack.
#[derive(Debug, Clone, Parser)]
#[command(name = "statusbot", version, about)]
pub struct Cli {
    /// Sites file, JSON, YAML or TOML (by extension)
    #[arg(short, long, env = "STATUSBOT_CONFIG", default_value = "sites.json")]
    pub file: PathBuf,

    /// Ping interval in seconds, applied to all sites
    #[arg(
        short,
        long,
        env = "STATUSBOT_WAIT",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub wait: u64,

    /// Slack channel to send notifications to
    #[arg(short, long, env = "STATUSBOT_CHANNEL", default_value = "#status-bot")]
    pub chan: String,

    /// Per-request probe timeout in seconds
    #[arg(
        long,
        env = "STATUSBOT_PROBE_TIMEOUT",
        default_value_t = 2,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub probe_timeout: u64,
}

impl Cli {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.wait)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }
}

#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub url: String,
}

impl WebhookSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(env::var(WEBHOOK_ENV).ok())
    }

    fn from_value(raw: Option<String>) -> Result<Self, ConfigError> {
        match raw.map(|v| v.trim().to_string()) {
            Some(url) if !url.is_empty() => Ok(Self { url }),
            _ => Err(ConfigError::MissingWebhook),
        }
    }
}

/// Loads the site list. Read and parse failures are returned, never
/// swallowed into an empty list.
pub fn load_sites(path: &Path) -> Result<SiteList, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let path_buf = || path.to_path_buf();
    let file: SitesFile = match SitesFormat::from_path(path) {
        SitesFormat::Json => serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Json { path: path_buf(), source })?,
        SitesFormat::Yaml => serde_yaml::from_str(&contents)
            .map_err(|source| ConfigError::Yaml { path: path_buf(), source })?,
        SitesFormat::Toml => toml::from_str(&contents)
            .map_err(|source| ConfigError::Toml { path: path_buf(), source })?,
    };

    if file.sites.is_empty() {
        warn!("No sites configured in {}; nothing will be watched", path.display());
    } else {
        info!("Loaded {} sites from {}", file.sites.len(), path.display());
    }
    Ok(file.sites)
}
