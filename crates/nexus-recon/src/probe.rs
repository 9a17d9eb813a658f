//! Failure-tolerant wrappers for the HTTP-backed probes.

use nexus_client::{Fingerprint, GeoLocate};
use nexus_core::{GeoInfo, HttpFingerprint};
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

/// Geolocate `ip` within `budget`; `None` on any failure or timeout
pub async fn geolocate(geo: &dyn GeoLocate, ip: Ipv4Addr, budget: Duration) -> Option<GeoInfo> {
    match tokio::time::timeout(budget, geo.locate(ip)).await {
        Ok(Ok(info)) => Some(info),
        Ok(Err(e)) => {
            debug!(ip = %ip, error = %e, "geolocation settled empty");
            None
        }
        Err(_) => {
            debug!(ip = %ip, budget_ms = budget.as_millis(), "geolocation timed out");
            None
        }
    }
}

/// Fingerprint `url` within `budget`; the error marker on any failure or timeout
pub async fn fingerprint(http: &dyn Fingerprint, url: &str, budget: Duration) -> HttpFingerprint {
    match tokio::time::timeout(budget, http.fingerprint(url)).await {
        Ok(Ok(headers)) => HttpFingerprint::Reachable(headers),
        Ok(Err(e)) => {
            debug!(url = url, error = %e, "fingerprint unreachable");
            HttpFingerprint::unreachable()
        }
        Err(_) => {
            debug!(url = url, budget_ms = budget.as_millis(), "fingerprint aborted");
            HttpFingerprint::unreachable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nexus_core::{HttpHeaders, NexusError, Result};

    struct HangingProvider;

    #[async_trait]
    impl GeoLocate for HangingProvider {
        async fn locate(&self, _ip: Ipv4Addr) -> Result<GeoInfo> {
            std::future::pending().await
        }
    }

    #[async_trait]
    impl Fingerprint for HangingProvider {
        async fn fingerprint(&self, _url: &str) -> Result<HttpHeaders> {
            std::future::pending().await
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl GeoLocate for BrokenProvider {
        async fn locate(&self, _ip: Ipv4Addr) -> Result<GeoInfo> {
            Err(NexusError::Http("connection reset".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_geo_provider_is_bounded() {
        let geo = geolocate(&HangingProvider, Ipv4Addr::LOCALHOST, Duration::from_secs(4)).await;
        assert!(geo.is_none());
    }

    #[tokio::test]
    async fn test_geo_error_collapses() {
        let geo = geolocate(&BrokenProvider, Ipv4Addr::LOCALHOST, Duration::from_secs(4)).await;
        assert!(geo.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_fingerprint_is_unreachable() {
        let fp = fingerprint(&HangingProvider, "http://example.com/", Duration::from_secs(4)).await;
        assert_eq!(fp, HttpFingerprint::unreachable());
    }
}
