//! Command implementations.

pub mod config;
pub mod dns;
pub mod lookup;
pub mod scan;

use anyhow::Result;
use nexus::{LookupConfig, LookupEngine, NexusClient};
use tabled::settings::Style;
use tabled::Table;

use crate::config::Config;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format
    pub output_format: OutputFormat,

    /// Verbosity level (count of -v)
    pub verbose: u8,

    /// Disable colors
    pub no_color: bool,

    /// Loaded configuration file
    pub config: Config,
}

impl Context {
    /// HTTP client for the geolocation and fingerprint probes.
    pub fn client(&self, lookup: &LookupConfig) -> Result<NexusClient> {
        let mut builder = NexusClient::builder()
            .geo_timeout(lookup.geo_timeout)
            .fingerprint_timeout(lookup.http_timeout);

        if let Some(url) = &self.config.geo_base_url {
            builder = builder.geo_base_url(url);
        }

        Ok(builder.build()?)
    }

    /// Lookup engine backed by the system resolver and real sockets.
    pub fn engine(&self, lookup: LookupConfig) -> Result<LookupEngine> {
        let client = self.client(&lookup)?;
        Ok(LookupEngine::builder(lookup).with_client(client).build()?)
    }

    /// Apply the table style for the current color mode.
    pub fn style_table(&self, table: &mut Table) -> String {
        if self.no_color {
            table.with(Style::ascii());
        } else {
            table.with(Style::rounded());
        }
        table.to_string()
    }
}
