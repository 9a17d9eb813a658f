//! TCP connect port scanning.

use crate::config::LookupConfig;
use crate::error::{ReconError, ReconResult};
use async_trait::async_trait;
use nexus_core::OpenPort;
use serde::Serialize;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Candidate ports probed when nothing else is configured
pub const DEFAULT_PORTS: [u16; 16] = [
    21, 22, 25, 53, 80, 443, 3000, 3306, 5432, 5672, 6379, 8000, 8080, 8443, 9200, 27017,
];

/// Display label for a well-known port
#[must_use]
pub const fn service_name(port: u16) -> &'static str {
    match port {
        21 => "FTP",
        22 => "SSH",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        443 => "HTTPS",
        3000 => "Node.js / Dev Server",
        3306 => "MySQL",
        5432 => "PostgreSQL",
        5672 => "RabbitMQ",
        6379 => "Redis",
        8000 => "HTTP-Alt",
        8080 => "HTTP-Proxy",
        8443 => "HTTPS-Alt",
        9200 => "Elasticsearch",
        27017 => "MongoDB",
        _ => "Unknown",
    }
}

/// Port specification for scanning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PortSpec {
    /// The fixed well-known set in [`DEFAULT_PORTS`]
    #[default]
    Default,
    /// Custom port range
    Range(RangeInclusive<u16>),
    /// Specific list of ports, probed in the given order
    List(Vec<u16>),
}

impl PortSpec {
    /// Convert to an ordered list of ports
    #[must_use]
    pub fn to_ports(&self) -> Vec<u16> {
        match self {
            Self::Default => DEFAULT_PORTS.to_vec(),
            Self::Range(r) => r.clone().collect(),
            Self::List(l) => l.clone(),
        }
    }
}

impl FromStr for PortSpec {
    type Err = ReconError;

    /// Accepts `default`, a range like `1-1024`, or a comma list like `22,80,8000-8010`.
    fn from_str(s: &str) -> ReconResult<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("default") {
            return Ok(Self::Default);
        }

        let parse_port = |p: &str| {
            p.trim()
                .parse::<u16>()
                .ok()
                .filter(|&n| n != 0)
                .ok_or_else(|| ReconError::InvalidPorts(format!("bad port '{p}'")))
        };
        let parse_range = |item: &str| -> ReconResult<RangeInclusive<u16>> {
            match item.split_once('-') {
                Some((lo, hi)) => {
                    let (lo, hi) = (parse_port(lo)?, parse_port(hi)?);
                    if lo > hi {
                        return Err(ReconError::InvalidPorts(format!("empty range '{item}'")));
                    }
                    Ok(lo..=hi)
                }
                None => parse_port(item).map(|p| p..=p),
            }
        };

        if !s.contains(',') {
            let range = parse_range(s)?;
            return Ok(if range.start() == range.end() {
                Self::List(vec![*range.start()])
            } else {
                Self::Range(range)
            });
        }

        let mut ports = Vec::new();
        for item in s.split(',').filter(|i| !i.trim().is_empty()) {
            ports.extend(parse_range(item)?);
        }
        Ok(Self::List(ports))
    }
}

/// Raw TCP connect primitive
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open and immediately close a connection to `addr`
    async fn connect(&self, addr: SocketAddrV4) -> ReconResult<()>;
}

/// Connector backed by tokio sockets
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, addr: SocketAddrV4) -> ReconResult<()> {
        let stream = TcpStream::connect(addr).await?;
        // Nothing is written; dropping the stream closes the socket
        drop(stream);
        Ok(())
    }
}

/// Port scan result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Target address
    pub target: Ipv4Addr,
    /// Open ports, in candidate order
    pub open_ports: Vec<OpenPort>,
    /// Every candidate port that was probed
    pub scanned_ports: Vec<u16>,
    /// Total scan duration
    #[serde(skip)]
    pub scan_time: Duration,
}

/// Concurrent TCP connect scanner
#[derive(Clone)]
pub struct Scanner {
    ports: Vec<u16>,
    timeout: Duration,
    concurrency: usize,
    connector: Arc<dyn Connector>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Create a new scanner with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&LookupConfig::default())
    }

    /// Create a scanner from a lookup configuration
    #[must_use]
    pub fn with_config(config: &LookupConfig) -> Self {
        Self {
            ports: config.ports.to_ports(),
            timeout: config.port_timeout,
            concurrency: config.concurrency,
            connector: Arc::new(TcpConnector),
        }
    }

    /// Set the ports to scan
    #[must_use]
    pub fn ports(mut self, ports: &PortSpec) -> Self {
        self.ports = ports.to_ports();
        self
    }

    /// Set the timeout per probe
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of in-flight connects
    #[must_use]
    pub const fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    /// Replace the connect primitive
    #[must_use]
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Candidate ports, in probe order
    #[must_use]
    pub fn candidate_ports(&self) -> &[u16] {
        &self.ports
    }

    /// Scan a single target.
    ///
    /// Every port is probed on its own task; total latency is bounded by
    /// roughly one timeout as long as the concurrency limit covers the set.
    pub async fn scan(&self, target: Ipv4Addr) -> ScanResult {
        let start = Instant::now();
        // More permits than ports buys nothing; tokio also caps the total
        let permits = self
            .concurrency
            .min(self.ports.len())
            .clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));

        let handles: Vec<_> = self
            .ports
            .iter()
            .map(|&port| {
                let sem = Arc::clone(&semaphore);
                let connector = Arc::clone(&self.connector);
                let timeout = self.timeout;
                let addr = SocketAddrV4::new(target, port);

                tokio::spawn(async move {
                    let Ok(_permit) = sem.acquire_owned().await else {
                        return false;
                    };
                    probe_port(connector.as_ref(), addr, timeout).await
                })
            })
            .collect();

        let mut open_ports = Vec::new();
        for (&port, handle) in self.ports.iter().zip(handles) {
            if matches!(handle.await, Ok(true)) {
                open_ports.push(OpenPort {
                    port,
                    service: service_name(port).to_string(),
                });
            }
        }

        let scan_time = start.elapsed();
        debug!(
            target = %target,
            scanned = self.ports.len(),
            open = open_ports.len(),
            elapsed_ms = scan_time.as_millis(),
            "port scan complete"
        );

        ScanResult {
            target,
            open_ports,
            scanned_ports: self.ports.clone(),
            scan_time,
        }
    }
}

/// One bounded connect attempt. A timeout drops the in-flight connect,
/// which releases its socket.
async fn probe_port(connector: &dyn Connector, addr: SocketAddrV4, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, connector.connect(addr)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            trace!(addr = %addr, error = %e, "port closed");
            false
        }
        Err(_) => {
            trace!(addr = %addr, "port timed out");
            false
        }
    }
}
