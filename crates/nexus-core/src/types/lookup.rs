use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use super::{DnsRecordSet, GeoInfo, HttpFingerprint, OpenPort, TargetKind};

/// Aggregate report for one lookup request.
///
/// Every field is filled from settled probes; absent enrichment is `null`
/// (or an empty list) rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    /// Input as received, trimmed
    pub original_input: String,

    /// When the lookup started
    pub timestamp: DateTime<Utc>,

    /// Classification of the input
    pub input_type: TargetKind,

    /// URL hostname for domain input, first PTR name for IP input
    pub hostname: Option<String>,

    /// All PTR names for the probed address
    pub reverse_hostnames: Option<Vec<String>>,

    /// URL scheme for domain input
    pub protocol: Option<String>,

    /// The probed address
    pub ip: Ipv4Addr,

    /// Every forward-resolved address (the raw address for IP input)
    pub ip_addresses: Vec<Ipv4Addr>,

    /// MX/TXT/NS records
    pub dns: DnsRecordSet,

    /// Geolocation, `null` when the provider failed
    pub geo: Option<GeoInfo>,

    /// HTTP fingerprint, `null` for IP input
    pub http: Option<HttpFingerprint>,

    /// Ports that accepted a connection, in candidate order
    pub open_ports: Vec<OpenPort>,

    /// Every candidate port that was probed
    pub scanned_ports: Vec<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_keys() {
        let result = LookupResult {
            original_input: "8.8.8.8".into(),
            timestamp: Utc::now(),
            input_type: TargetKind::Ip,
            hostname: None,
            reverse_hostnames: None,
            protocol: None,
            ip: Ipv4Addr::new(8, 8, 8, 8),
            ip_addresses: vec![Ipv4Addr::new(8, 8, 8, 8)],
            dns: DnsRecordSet::default(),
            geo: None,
            http: None,
            open_ports: vec![OpenPort {
                port: 53,
                service: "DNS".into(),
            }],
            scanned_ports: vec![53, 443],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["originalInput"], "8.8.8.8");
        assert_eq!(json["inputType"], "ip");
        assert_eq!(json["ip"], "8.8.8.8");
        assert!(json["geo"].is_null());
        assert!(json["http"].is_null());
        assert!(json["hostname"].is_null());
        assert_eq!(json["openPorts"][0]["service"], "DNS");
        assert_eq!(json["scannedPorts"], serde_json::json!([53, 443]));
    }
}
