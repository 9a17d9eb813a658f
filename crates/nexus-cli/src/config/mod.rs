//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use nexus::{LookupConfig, PortSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::output::OutputFormat;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "NEXUS_CONFIG";

/// Keys accepted by `nexus config set`.
pub const KEYS: &[(&str, &str)] = &[
    ("output_format", "Default output format (pretty/json/yaml)"),
    ("port_timeout_ms", "Per-port connect timeout in milliseconds"),
    ("http_timeout_ms", "HTTP fingerprint timeout in milliseconds"),
    ("geo_timeout_ms", "Geolocation timeout in milliseconds"),
    ("geo_base_url", "Base URL of the ip-api compatible geolocation service"),
    ("ports", "Ports to scan (default, 1-1024, 22,80,443)"),
];

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Per-port connect timeout.
    pub port_timeout_ms: Option<u64>,

    /// HTTP fingerprint timeout.
    pub http_timeout_ms: Option<u64>,

    /// Geolocation timeout.
    pub geo_timeout_ms: Option<u64>,

    /// Geolocation service base URL.
    pub geo_base_url: Option<String>,

    /// Port specification, validated on `set`.
    pub ports: Option<String>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "nexus", "nexus")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Set one key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let millis = |v: &str| -> Result<u64> {
            let ms: u64 = v.parse().with_context(|| format!("'{v}' is not a number of milliseconds"))?;
            anyhow::ensure!(ms > 0, "timeout must be greater than zero");
            Ok(ms)
        };

        match key {
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "port_timeout_ms" => self.port_timeout_ms = Some(millis(value)?),
            "http_timeout_ms" => self.http_timeout_ms = Some(millis(value)?),
            "geo_timeout_ms" => self.geo_timeout_ms = Some(millis(value)?),
            "geo_base_url" => self.geo_base_url = Some(value.to_string()),
            "ports" => {
                value.parse::<PortSpec>()?;
                self.ports = Some(value.to_string());
            }
            _ => {
                let available: Vec<String> =
                    KEYS.iter().map(|(k, help)| format!("  {k:16} - {help}")).collect();
                anyhow::bail!("Unknown config key: {key}\n\nAvailable keys:\n{}", available.join("\n"));
            }
        }

        Ok(())
    }

    /// Engine settings with the configured overrides applied.
    pub fn lookup_config(&self) -> Result<LookupConfig> {
        let mut config = LookupConfig::default();

        if let Some(ports) = &self.ports {
            config = config.ports(ports.parse()?);
        }
        if let Some(ms) = self.port_timeout_ms {
            config = config.port_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.http_timeout_ms {
            config = config.http_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.geo_timeout_ms {
            config = config.geo_timeout(Duration::from_millis(ms));
        }

        Ok(config)
    }
}
