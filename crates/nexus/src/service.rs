//! Service boundary in front of the lookup engine.

use nexus_client::{LookupLimiter, RateLimitConfig};
use nexus_core::{LookupResult, NexusError, Result};
use nexus_recon::{LookupConfig, LookupEngine};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{error, instrument};

/// Rate-limited, panic-isolated entry point for lookups.
///
/// Cheap to clone; clones share the engine and the token buckets.
#[derive(Clone)]
pub struct NexusService {
    engine: LookupEngine,
    limiter: Arc<LookupLimiter>,
}

impl NexusService {
    /// Wrap an engine with the given limiter
    #[must_use]
    pub fn new(engine: LookupEngine, limiter: LookupLimiter) -> Self {
        Self {
            engine,
            limiter: Arc::new(limiter),
        }
    }

    /// Build the default engine and limiter from configuration
    pub fn from_config(lookup: LookupConfig, limits: RateLimitConfig) -> Result<Self> {
        Ok(Self::new(LookupEngine::new(lookup)?, LookupLimiter::new(limits)))
    }

    /// Run one lookup on behalf of `caller`.
    ///
    /// The lookup runs on its own task; a panic inside it is reported as
    /// [`NexusError::Internal`] instead of unwinding into the caller.
    #[instrument(skip(self))]
    pub async fn lookup(&self, caller: &str, input: &str) -> Result<LookupResult> {
        self.limiter.check(caller)?;

        let engine = self.engine.clone();
        let input = input.to_owned();
        tokio::spawn(async move { engine.lookup(&input).await })
            .await
            .map_err(|e| {
                error!(error = %e, "lookup task aborted");
                NexusError::Internal(format!("lookup task failed: {e}"))
            })?
    }

    /// Forget idle callers in the per-caller buckets
    pub fn prune(&self) {
        self.limiter.prune();
    }
}

/// Echo the caller's address, unwrapping IPv4-mapped IPv6 forms
#[must_use]
pub fn whoami(client_addr: IpAddr) -> String {
    match client_addr {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map_or_else(|| v6.to_string(), |v4| v4.to_string()),
        IpAddr::V4(v4) => v4.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nexus_client::{Fingerprint, GeoLocate};
    use nexus_core::{GeoInfo, HttpHeaders, MxRecord};
    use nexus_recon::{Connector, DnsBackend, ReconError, ReconResult};
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::assert_ok;

    /// Forward lookups panic for `boom.test`; everything else is empty.
    struct CountingDns(Arc<AtomicUsize>);

    #[async_trait]
    impl DnsBackend for CountingDns {
        async fn lookup_ipv4(&self, host: &str) -> ReconResult<Vec<Ipv4Addr>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            assert_ne!(host, "boom.test", "resolver exploded");
            Ok(vec![Ipv4Addr::new(192, 0, 2, 10)])
        }

        async fn reverse(&self, _ip: Ipv4Addr) -> ReconResult<Vec<String>> {
            Err(ReconError::Dns("no PTR".into()))
        }

        async fn lookup_mx(&self, _host: &str) -> ReconResult<Vec<MxRecord>> {
            Ok(vec![])
        }

        async fn lookup_txt(&self, _host: &str) -> ReconResult<Vec<Vec<String>>> {
            Ok(vec![])
        }

        async fn lookup_ns(&self, _host: &str) -> ReconResult<Vec<String>> {
            Ok(vec![])
        }
    }

    struct Offline;

    #[async_trait]
    impl GeoLocate for Offline {
        async fn locate(&self, _ip: Ipv4Addr) -> Result<GeoInfo> {
            Err(NexusError::Http("offline".into()))
        }
    }

    #[async_trait]
    impl Fingerprint for Offline {
        async fn fingerprint(&self, _url: &str) -> Result<HttpHeaders> {
            Err(NexusError::Http("offline".into()))
        }
    }

    #[async_trait]
    impl Connector for Offline {
        async fn connect(&self, _addr: SocketAddrV4) -> ReconResult<()> {
            Err(ReconError::Network(std::io::ErrorKind::ConnectionRefused.into()))
        }
    }

    fn service(limits: RateLimitConfig) -> (NexusService, Arc<AtomicUsize>) {
        let forward = Arc::new(AtomicUsize::new(0));
        let engine = LookupEngine::builder(LookupConfig::default())
            .with_dns(Arc::new(CountingDns(Arc::clone(&forward))))
            .with_geo(Arc::new(Offline))
            .with_fingerprint(Arc::new(Offline))
            .with_connector(Arc::new(Offline))
            .build()
            .unwrap();
        (NexusService::new(engine, LookupLimiter::new(limits)), forward)
    }

    #[tokio::test]
    async fn test_lookup_degrades_offline_probes() {
        let (service, _) = service(RateLimitConfig::default());
        let result = assert_ok!(service.lookup("198.51.100.7", "example.test").await);

        assert_eq!(result.ip, Ipv4Addr::new(192, 0, 2, 10));
        assert!(result.geo.is_none());
        assert!(result.open_ports.is_empty());
        assert!(result.http.is_some_and(|h| h.headers().is_none()));
    }

    #[tokio::test]
    async fn test_per_caller_quota() {
        let (service, forward) = service(RateLimitConfig::new().per_caller_per_minute(2));

        assert_ok!(service.lookup("a", "example.test").await);
        assert_ok!(service.lookup("a", "example.test").await);
        let err = service.lookup("a", "example.test").await.unwrap_err();
        assert!(matches!(err, NexusError::RateLimited { scope: "caller" }));
        assert_eq!(err.status_code(), 429);
        assert_eq!(forward.load(Ordering::SeqCst), 2);

        // Another caller still has its own budget
        assert_ok!(service.lookup("b", "example.test").await);
    }

    #[tokio::test]
    async fn test_global_quota() {
        let limits = RateLimitConfig::new().global(1, std::time::Duration::from_secs(900));
        let (service, _) = service(limits);

        assert_ok!(service.lookup("a", "example.test").await);
        let err = service.lookup("b", "example.test").await.unwrap_err();
        assert!(matches!(err, NexusError::RateLimited { scope: "global" }));
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let (service, _) = service(RateLimitConfig::default());

        let err = service.lookup("a", "boom.test").await.unwrap_err();
        assert!(matches!(err, NexusError::Internal(_)));
        assert_eq!(err.status_code(), 500);

        // The service keeps serving after a failed task
        assert_ok!(service.lookup("a", "example.test").await);
    }

    #[tokio::test]
    async fn test_input_errors_pass_through() {
        let (service, forward) = service(RateLimitConfig::default());

        let err = service.lookup("a", "  ").await.unwrap_err();
        assert!(matches!(err, NexusError::EmptyInput));
        assert_eq!(forward.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_whoami() {
        assert_eq!(whoami(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5))), "203.0.113.5");
        assert_eq!(
            whoami(IpAddr::V6(Ipv4Addr::new(203, 0, 113, 5).to_ipv6_mapped())),
            "203.0.113.5"
        );
        assert_eq!(whoami(IpAddr::V6(Ipv6Addr::LOCALHOST)), "::1");
    }
}
