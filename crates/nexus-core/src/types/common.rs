use serde::{Deserialize, Serialize};

/// Geographic and network ownership information for an address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoInfo {
    /// Full country name
    #[serde(default)]
    pub country: Option<String>,

    /// Two-letter country code (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub country_code: Option<String>,

    /// City name
    #[serde(default)]
    pub city: Option<String>,

    /// Internet service provider
    #[serde(default)]
    pub isp: Option<String>,

    /// Organization owning the address
    #[serde(default)]
    pub org: Option<String>,

    /// Latitude coordinate
    #[serde(default)]
    pub lat: Option<f64>,

    /// Longitude coordinate
    #[serde(default)]
    pub lon: Option<f64>,

    /// IANA timezone name
    #[serde(default)]
    pub timezone: Option<String>,

    /// Autonomous system, e.g. "AS15169 Google LLC"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<String>,
}

impl GeoInfo {
    /// Returns the coordinates as a tuple if available
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Placeholder reported for server-identifying headers that are absent
pub const HIDDEN_HEADER: &str = "Hidden";

/// Marker reported when the fingerprint request fails
pub const UNREACHABLE: &str = "Unreachable";

/// Status line and selected headers from a HEAD request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpHeaders {
    /// Final HTTP status code (after redirects)
    pub status: u16,

    /// Canonical reason phrase for the status
    pub status_text: String,

    /// `Server` header, or "Hidden"
    pub server: String,

    /// `X-Powered-By` header, or "Hidden"
    pub powered_by: String,

    /// `Content-Type` header
    pub content_type: Option<String>,

    /// Whether `Strict-Transport-Security` is present
    pub hsts: bool,

    /// `X-Frame-Options` header
    pub x_frame_options: Option<String>,
}

/// Outcome of the HTTP fingerprint probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HttpFingerprint {
    /// The server answered
    Reachable(HttpHeaders),
    /// The request failed or timed out
    Unreachable {
        /// Always "Unreachable"
        error: String,
    },
}

impl HttpFingerprint {
    /// The error marker value
    #[must_use]
    pub fn unreachable() -> Self {
        Self::Unreachable {
            error: UNREACHABLE.to_string(),
        }
    }

    /// Headers if the server answered
    #[must_use]
    pub const fn headers(&self) -> Option<&HttpHeaders> {
        match self {
            Self::Reachable(headers) => Some(headers),
            Self::Unreachable { .. } => None,
        }
    }
}

/// A port that accepted a TCP connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPort {
    /// Port number
    pub port: u16,

    /// Well-known service label, or "Unknown"
    pub service: String,
}
