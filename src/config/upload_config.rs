use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_KEY_HEADER, DEFAULT_SERVER_CHECKSUM_HEADER, STREAM_CHUNK_SIZE};

/// Lowest TLS protocol version the transport will negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum MinTlsVersion {
    #[default]
    #[serde(rename = "1.2")]
    #[value(name = "1.2")]
    Tls12,
    #[serde(rename = "1.3")]
    #[value(name = "1.3")]
    Tls13,
}

impl MinTlsVersion {
    pub fn as_reqwest(&self) -> reqwest::tls::Version {
        match self {
            MinTlsVersion::Tls12 => reqwest::tls::Version::TLS_1_2,
            MinTlsVersion::Tls13 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

impl fmt::Display for MinTlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinTlsVersion::Tls12 => write!(f, "1.2"),
            MinTlsVersion::Tls13 => write!(f, "1.3"),
        }
    }
}

impl FromStr for MinTlsVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().trim_start_matches("tls").trim_start_matches('v') {
            "1.2" | "12" => Ok(MinTlsVersion::Tls12),
            "1.3" | "13" => Ok(MinTlsVersion::Tls13),
            other => Err(anyhow!("Unsupported minimum TLS version: {}", other)),
        }
    }
}

/// Settings for the upload pipeline.
///
/// Every field has a default, so an empty YAML document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Header that carries the API key
    pub api_key_header: String,

    /// Response header in which the server reports its SHA-256
    pub server_checksum_header: String,

    /// Minimum TLS version for the HTTPS connection
    pub min_tls_version: MinTlsVersion,

    /// Overall request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,

    /// Size of each chunk streamed from the file to the socket
    pub stream_chunk_size: usize,

    /// User-Agent sent with the upload
    pub user_agent: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            server_checksum_header: DEFAULT_SERVER_CHECKSUM_HEADER.to_string(),
            min_tls_version: MinTlsVersion::default(),
            timeout_secs: None,
            stream_chunk_size: STREAM_CHUNK_SIZE,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl UploadConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: UploadConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        UploadConfig::default().save_to_yaml_file(path)
    }

    /// Reject settings the transport cannot honor.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("api_key_header", &self.api_key_header),
            ("server_checksum_header", &self.server_checksum_header),
        ] {
            if value.trim().is_empty() {
                bail!("{} must not be empty", field);
            }
            HeaderName::from_bytes(value.as_bytes())
                .map_err(|e| anyhow!("{} '{}' is not a valid header name: {}", field, value, e))?;
        }

        if self.stream_chunk_size == 0 {
            bail!("stream_chunk_size must be greater than zero");
        }

        if self.timeout_secs == Some(0) {
            bail!("timeout_secs must be greater than zero when set");
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from the given file, or fall back to defaults.
pub fn load_or_default_config(config_path: Option<&Path>) -> Result<UploadConfig> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            UploadConfig::from_yaml_file(path)
        }
        None => {
            debug!("No configuration file given, using defaults");
            Ok(UploadConfig::default())
        }
    }
}
