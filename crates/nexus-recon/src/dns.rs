//! DNS resolution and record probes.
//!
//! [`DnsBackend`] is the raw query seam; the free functions in this module are
//! the failure-tolerant wrappers the coordinator calls. They log backend
//! errors and settle to empty values instead of returning them.

use crate::error::{ReconError, ReconResult};
use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use nexus_core::{DnsRecordSet, MxRecord};
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

/// Typed resolver queries used by the lookup engine
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// A records for `host`
    async fn lookup_ipv4(&self, host: &str) -> ReconResult<Vec<Ipv4Addr>>;

    /// PTR names for `ip`
    async fn reverse(&self, ip: Ipv4Addr) -> ReconResult<Vec<String>>;

    /// MX records for `host`
    async fn lookup_mx(&self, host: &str) -> ReconResult<Vec<MxRecord>>;

    /// TXT records for `host`, one list of chunks per record
    async fn lookup_txt(&self, host: &str) -> ReconResult<Vec<Vec<String>>>;

    /// NS records for `host`
    async fn lookup_ns(&self, host: &str) -> ReconResult<Vec<String>>;
}

/// DNS resolver using the system configuration
#[derive(Clone)]
pub struct DnsResolver {
    resolver: TokioResolver,
}

impl DnsResolver {
    /// Create a resolver from the system configuration
    pub fn new() -> ReconResult<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| ReconError::Dns(format!("failed to create resolver: {e}")))?
            .build();
        Ok(Self { resolver })
    }
}

/// Names come back fully qualified; callers expect them without the root dot.
fn strip_root(name: impl ToString) -> String {
    let mut name = name.to_string();
    if name.ends_with('.') {
        name.pop();
    }
    name
}

#[async_trait]
impl DnsBackend for DnsResolver {
    async fn lookup_ipv4(&self, host: &str) -> ReconResult<Vec<Ipv4Addr>> {
        let response = self
            .resolver
            .ipv4_lookup(host)
            .await
            .map_err(|e| ReconError::Dns(e.to_string()))?;

        Ok(response.iter().map(|a| a.0).collect())
    }

    async fn reverse(&self, ip: Ipv4Addr) -> ReconResult<Vec<String>> {
        let response = self
            .resolver
            .reverse_lookup(IpAddr::V4(ip))
            .await
            .map_err(|e| ReconError::Dns(e.to_string()))?;

        Ok(response.iter().map(strip_root).collect())
    }

    async fn lookup_mx(&self, host: &str) -> ReconResult<Vec<MxRecord>> {
        let response = self
            .resolver
            .mx_lookup(host)
            .await
            .map_err(|e| ReconError::Dns(e.to_string()))?;

        Ok(response
            .iter()
            .map(|mx| MxRecord {
                exchange: strip_root(mx.exchange()),
                priority: mx.preference(),
            })
            .collect())
    }

    async fn lookup_txt(&self, host: &str) -> ReconResult<Vec<Vec<String>>> {
        let response = self
            .resolver
            .txt_lookup(host)
            .await
            .map_err(|e| ReconError::Dns(e.to_string()))?;

        Ok(response
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|data| String::from_utf8_lossy(data).into_owned())
                    .collect()
            })
            .collect())
    }

    async fn lookup_ns(&self, host: &str) -> ReconResult<Vec<String>> {
        let response = self
            .resolver
            .ns_lookup(host)
            .await
            .map_err(|e| ReconError::Dns(e.to_string()))?;

        Ok(response.iter().map(strip_root).collect())
    }
}

fn settle<T: Default>(query: &'static str, name: &str, result: ReconResult<T>) -> T {
    result.unwrap_or_else(|e| {
        debug!(query = query, name = name, error = %e, "DNS query settled empty");
        T::default()
    })
}

/// Forward-resolve `host` to IPv4 addresses; empty on any resolver error
pub async fn forward_resolve(dns: &dyn DnsBackend, host: &str) -> Vec<Ipv4Addr> {
    settle("A", host, dns.lookup_ipv4(host).await)
}

/// Reverse-resolve `ip` to hostnames; empty on any resolver error
pub async fn reverse_resolve(dns: &dyn DnsBackend, ip: Ipv4Addr) -> Vec<String> {
    settle("PTR", &ip.to_string(), dns.reverse(ip).await)
}

/// Run the MX, TXT and NS queries concurrently.
///
/// Each query settles independently; an IP string as `host` is queried as-is
/// and normally yields nothing.
pub async fn lookup_records(dns: &dyn DnsBackend, host: &str) -> DnsRecordSet {
    let (mx, txt, ns) = tokio::join!(dns.lookup_mx(host), dns.lookup_txt(host), dns.lookup_ns(host));

    DnsRecordSet::new(
        settle("MX", host, mx),
        settle("TXT", host, txt),
        settle("NS", host, ns),
    )
}
