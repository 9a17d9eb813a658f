//! Lookup configuration.

use crate::scanner::PortSpec;
use std::time::Duration;

/// Per-port TCP connect timeout
pub const DEFAULT_PORT_TIMEOUT: Duration = Duration::from_millis(1500);

/// Hard abort for the HTTP fingerprint probe
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(4);

/// Bound on the geolocation probe
pub const DEFAULT_GEO_TIMEOUT: Duration = Duration::from_secs(4);

/// Settings shared by every lookup an engine runs
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Candidate ports
    pub ports: PortSpec,
    /// Timeout per TCP connect
    pub port_timeout: Duration,
    /// Maximum in-flight connects per scan
    pub concurrency: usize,
    /// Budget for the HTTP fingerprint probe
    pub http_timeout: Duration,
    /// Budget for the geolocation probe
    pub geo_timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            ports: PortSpec::Default,
            port_timeout: DEFAULT_PORT_TIMEOUT,
            concurrency: 64,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            geo_timeout: DEFAULT_GEO_TIMEOUT,
        }
    }
}

impl LookupConfig {
    /// Set the candidate ports
    #[must_use]
    pub fn ports(mut self, ports: PortSpec) -> Self {
        self.ports = ports;
        self
    }

    /// Set the per-port connect timeout
    #[must_use]
    pub const fn port_timeout(mut self, timeout: Duration) -> Self {
        self.port_timeout = timeout;
        self
    }

    /// Set the maximum number of in-flight connects
    #[must_use]
    pub const fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    /// Set the HTTP fingerprint budget
    #[must_use]
    pub const fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the geolocation budget
    #[must_use]
    pub const fn geo_timeout(mut self, timeout: Duration) -> Self {
        self.geo_timeout = timeout;
        self
    }
}
