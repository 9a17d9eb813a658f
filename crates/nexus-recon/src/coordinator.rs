//! Probe coordination: classify, resolve, fan out, fan in, aggregate.

use crate::classify::classify;
use crate::config::LookupConfig;
use crate::dns::{self, DnsBackend, DnsResolver};
use crate::probe;
use crate::scanner::{Connector, Scanner};
use chrono::Utc;
use nexus_client::{Fingerprint, GeoLocate, NexusClient};
use nexus_core::{LookupResult, NexusError, Result, Target};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{info, instrument};

/// Lookup engine.
///
/// Holds only immutable collaborators, so one engine can serve any number of
/// concurrent lookups; every lookup computes its result from scratch.
#[derive(Clone)]
pub struct LookupEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    dns: Arc<dyn DnsBackend>,
    geo: Arc<dyn GeoLocate>,
    http: Arc<dyn Fingerprint>,
    scanner: Scanner,
    config: LookupConfig,
}

impl LookupEngine {
    /// Create an engine with the system resolver, real sockets and the default HTTP client
    pub fn new(config: LookupConfig) -> Result<Self> {
        LookupEngineBuilder::new(config).build()
    }

    /// Create a builder for custom collaborators
    #[must_use]
    pub fn builder(config: LookupConfig) -> LookupEngineBuilder {
        LookupEngineBuilder::new(config)
    }

    /// Scanner used for the port probe
    #[must_use]
    pub fn scanner(&self) -> &Scanner {
        &self.inner.scanner
    }

    /// Run one lookup.
    ///
    /// Only empty/invalid input and an unresolvable domain fail the request;
    /// every probe failure degrades to an absent value in the result.
    #[instrument(skip(self), fields(kind = tracing::field::Empty))]
    pub async fn lookup(&self, input: &str) -> Result<LookupResult> {
        let target = classify(input)?;
        tracing::Span::current().record("kind", tracing::field::display(target.kind));
        let timestamp = Utc::now();

        let addresses = self.resolve_target(&target).await?;
        let ip = *addresses
            .first()
            .ok_or_else(|| NexusError::ResolutionFailed {
                host: target.host.clone(),
            })?;

        let inner = &self.inner;
        let http_probe = async {
            match target.url.as_deref() {
                Some(url) if target.is_domain() => {
                    Some(probe::fingerprint(inner.http.as_ref(), url, inner.config.http_timeout).await)
                }
                _ => None,
            }
        };

        let (reverse, records, geo, http, scan) = tokio::join!(
            dns::reverse_resolve(inner.dns.as_ref(), ip),
            dns::lookup_records(inner.dns.as_ref(), &target.host),
            probe::geolocate(inner.geo.as_ref(), ip, inner.config.geo_timeout),
            http_probe,
            inner.scanner.scan(ip),
        );

        let hostname = if target.is_domain() {
            Some(target.host.clone())
        } else {
            reverse.first().cloned()
        };

        info!(
            target = %target.raw,
            ip = %ip,
            open_ports = scan.open_ports.len(),
            geo = geo.is_some(),
            "lookup complete"
        );

        Ok(LookupResult {
            original_input: target.raw,
            timestamp,
            input_type: target.kind,
            hostname,
            reverse_hostnames: (!reverse.is_empty()).then_some(reverse),
            protocol: target.protocol,
            ip,
            ip_addresses: addresses,
            dns: records,
            geo,
            http,
            open_ports: scan.open_ports,
            scanned_ports: scan.scanned_ports,
        })
    }

    /// Establish the addresses to probe. Blocking and mandatory for domains.
    async fn resolve_target(&self, target: &Target) -> Result<Vec<Ipv4Addr>> {
        if let Some(addr) = target.literal {
            return Ok(vec![addr]);
        }

        let addresses = dns::forward_resolve(self.inner.dns.as_ref(), &target.host).await;
        if addresses.is_empty() {
            return Err(NexusError::ResolutionFailed {
                host: target.host.clone(),
            });
        }
        Ok(addresses)
    }
}

/// Builder for a [`LookupEngine`] with replaceable collaborators
pub struct LookupEngineBuilder {
    config: LookupConfig,
    dns: Option<Arc<dyn DnsBackend>>,
    geo: Option<Arc<dyn GeoLocate>>,
    http: Option<Arc<dyn Fingerprint>>,
    connector: Option<Arc<dyn Connector>>,
    client: Option<NexusClient>,
}

impl LookupEngineBuilder {
    /// Create a builder with the given configuration
    #[must_use]
    pub fn new(config: LookupConfig) -> Self {
        Self {
            config,
            dns: None,
            geo: None,
            http: None,
            connector: None,
            client: None,
        }
    }

    /// Use a custom resolver
    #[must_use]
    pub fn with_dns(mut self, dns: Arc<dyn DnsBackend>) -> Self {
        self.dns = Some(dns);
        self
    }

    /// Use a custom geolocation source
    #[must_use]
    pub fn with_geo(mut self, geo: Arc<dyn GeoLocate>) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Use a custom fingerprint source
    #[must_use]
    pub fn with_fingerprint(mut self, http: Arc<dyn Fingerprint>) -> Self {
        self.http = Some(http);
        self
    }

    /// Use a custom TCP connect primitive
    #[must_use]
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Use a preconfigured HTTP client for geolocation and fingerprinting
    #[must_use]
    pub fn with_client(mut self, client: NexusClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the engine, creating default collaborators for anything unset
    pub fn build(self) -> Result<LookupEngine> {
        let dns: Arc<dyn DnsBackend> = match self.dns {
            Some(dns) => dns,
            None => Arc::new(DnsResolver::new()?),
        };

        let (geo, http): (Arc<dyn GeoLocate>, Arc<dyn Fingerprint>) = match (self.geo, self.http) {
            (Some(geo), Some(http)) => (geo, http),
            (geo, http) => {
                let client = match self.client {
                    Some(client) => client,
                    None => NexusClient::builder()
                        .geo_timeout(self.config.geo_timeout)
                        .fingerprint_timeout(self.config.http_timeout)
                        .build()?,
                };
                (
                    geo.unwrap_or_else(|| Arc::new(client.clone()) as Arc<dyn GeoLocate>),
                    http.unwrap_or_else(|| Arc::new(client) as Arc<dyn Fingerprint>),
                )
            }
        };

        let mut scanner = Scanner::with_config(&self.config);
        if let Some(connector) = self.connector {
            scanner = scanner.connector(connector);
        }

        Ok(LookupEngine {
            inner: Arc::new(EngineInner {
                dns,
                geo,
                http,
                scanner,
                config: self.config,
            }),
        })
    }
}
