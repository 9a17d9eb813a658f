//! Shared HTTP client used by the outbound probes.

use nexus_core::{NexusError, Result};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Geolocation provider base URL
const DEFAULT_GEO_BASE_URL: &str = "http://ip-api.com";

/// Hard abort for the HEAD fingerprint request
const DEFAULT_FINGERPRINT_TIMEOUT: Duration = Duration::from_secs(4);

/// Bound on the geolocation call
const DEFAULT_GEO_TIMEOUT: Duration = Duration::from_secs(4);

/// HTTP client for the geolocation and fingerprint probes
#[derive(Clone)]
pub struct NexusClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    geo_base_url: String,
    geo_timeout: Duration,
    fingerprint_timeout: Duration,
}

impl NexusClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        NexusClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> NexusClientBuilder {
        NexusClientBuilder::new()
    }

    /// Base URL of the geolocation provider
    #[must_use]
    pub fn geo_base_url(&self) -> &str {
        &self.inner.geo_base_url
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    pub(crate) fn geo_timeout(&self) -> Duration {
        self.inner.geo_timeout
    }

    pub(crate) fn fingerprint_timeout(&self) -> Duration {
        self.inner.fingerprint_timeout
    }

    /// Perform a GET request and return the body text
    pub(crate) async fn get_text(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<String> {
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NexusError::Http(format!("{url} returned {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| NexusError::Http(e.to_string()))
    }
}

/// Convert a reqwest failure, keeping timeouts distinguishable
pub(crate) fn map_transport_error(err: &reqwest::Error, timeout: Duration) -> NexusError {
    if err.is_timeout() {
        NexusError::Timeout(timeout)
    } else {
        NexusError::Http(err.to_string())
    }
}

/// Builder for configuring a [`NexusClient`]
pub struct NexusClientBuilder {
    geo_base_url: String,
    geo_timeout: Duration,
    fingerprint_timeout: Duration,
    user_agent: String,
}

impl Default for NexusClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NexusClientBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            geo_timeout: DEFAULT_GEO_TIMEOUT,
            fingerprint_timeout: DEFAULT_FINGERPRINT_TIMEOUT,
            user_agent: format!("nexus/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the geolocation base URL (useful for testing)
    #[must_use]
    pub fn geo_base_url(mut self, url: impl Into<String>) -> Self {
        self.geo_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the geolocation request timeout
    #[must_use]
    pub const fn geo_timeout(mut self, timeout: Duration) -> Self {
        self.geo_timeout = timeout;
        self
    }

    /// Set the HEAD fingerprint request timeout
    #[must_use]
    pub const fn fingerprint_timeout(mut self, timeout: Duration) -> Self {
        self.fingerprint_timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<NexusClient> {
        let http = HttpClient::builder()
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| NexusError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(NexusClient {
            inner: Arc::new(ClientInner {
                http,
                geo_base_url: self.geo_base_url,
                geo_timeout: self.geo_timeout,
                fingerprint_timeout: self.fingerprint_timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_base_url() {
        let client = NexusClient::builder()
            .geo_base_url("http://127.0.0.1:9000/")
            .build()
            .unwrap();
        assert_eq!(client.geo_base_url(), "http://127.0.0.1:9000");
        assert_eq!(client.fingerprint_timeout(), Duration::from_secs(4));
    }
}
