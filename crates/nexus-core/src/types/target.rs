use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// How a raw input was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Bare dotted-quad IPv4 address
    Ip,
    /// Hostname or URL
    Domain,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ip => write!(f, "ip"),
            Self::Domain => write!(f, "domain"),
        }
    }
}

/// Classified lookup target.
///
/// Built once per request by the classifier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Classification of the raw input
    pub kind: TargetKind,

    /// Trimmed input as received
    pub raw: String,

    /// Host used for resolution and DNS record queries
    pub host: String,

    /// Address known without resolution (IP input, or a URL with an IPv4 host)
    pub literal: Option<Ipv4Addr>,

    /// Normalized URL, only for domain targets
    pub url: Option<String>,

    /// URL scheme, only for domain targets
    pub protocol: Option<String>,
}

impl Target {
    /// Build an IP target from its parsed address
    #[must_use]
    pub fn ip(raw: impl Into<String>, addr: Ipv4Addr) -> Self {
        let raw = raw.into();
        Self {
            kind: TargetKind::Ip,
            host: raw.clone(),
            raw,
            literal: Some(addr),
            url: None,
            protocol: None,
        }
    }

    /// Build a domain target from a parsed URL
    #[must_use]
    pub fn domain(
        raw: impl Into<String>,
        host: impl Into<String>,
        url: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            kind: TargetKind::Domain,
            raw: raw.into(),
            host: host.into(),
            literal: None,
            url: Some(url.into()),
            protocol: Some(protocol.into()),
        }
    }

    /// Attach an address that makes forward resolution unnecessary
    #[must_use]
    pub const fn with_literal(mut self, addr: Ipv4Addr) -> Self {
        self.literal = Some(addr);
        self
    }

    /// Returns true for hostname/URL targets
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self.kind, TargetKind::Domain)
    }
}
