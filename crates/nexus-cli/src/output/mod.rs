//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl OutputFormat {
    /// Whether this format is meant for humans rather than other programs
    pub const fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }

    /// Print a serializable value in a machine format.
    ///
    /// Pretty callers render their own view; this falls back to JSON for them.
    pub fn print<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        match self {
            Self::Yaml => print!("{}", serde_yaml::to_string(value)?),
            Self::Json | Self::Pretty => println!("{}", serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json, yaml"
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Stderr spinner shown while probes run; hidden for machine formats.
pub fn spinner(format: OutputFormat, message: impl Into<String>) -> ProgressBar {
    if !format.is_pretty() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_display_matches_value_names() {
        for format in OutputFormat::value_variants() {
            let name = format.to_string();
            assert_eq!(<OutputFormat as FromStr>::from_str(&name).unwrap(), *format);
        }
    }
}
