//! Geolocation lookups against an ip-api compatible provider.

use crate::client::NexusClient;
use async_trait::async_trait;
use nexus_core::{GeoInfo, NexusError, Result};
use serde::Deserialize;
use std::net::Ipv4Addr;
use tracing::instrument;

/// Field set requested from the provider
const GEO_FIELDS: &str = "status,message,country,countryCode,city,isp,org,lat,lon,timezone,as";

/// Geolocation source keyed by address
#[async_trait]
pub trait GeoLocate: Send + Sync {
    /// Locate an address. Provider-reported failures are errors.
    async fn locate(&self, ip: Ipv4Addr) -> Result<GeoInfo>;
}

#[async_trait]
impl GeoLocate for NexusClient {
    #[instrument(skip(self), fields(provider = "ip-api"))]
    async fn locate(&self, ip: Ipv4Addr) -> Result<GeoInfo> {
        let url = format!("{}/json/{ip}", self.geo_base_url());
        let body = self
            .get_text(&url, &[("fields", GEO_FIELDS)], self.geo_timeout())
            .await?;

        let response: IpApiResponse = serde_json::from_str(&body)?;
        response.into_geo()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    isp: Option<String>,
    #[serde(default)]
    org: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default, rename = "as")]
    asn: Option<String>,
}

impl IpApiResponse {
    /// Success is gated on the provider's own flag, not the HTTP status
    fn into_geo(self) -> Result<GeoInfo> {
        if self.status != "success" {
            return Err(NexusError::Http(format!(
                "geolocation provider reported {}: {}",
                self.status,
                self.message.as_deref().unwrap_or("no message")
            )));
        }

        Ok(GeoInfo {
            country: self.country,
            country_code: self.country_code,
            city: self.city,
            isp: self.isp,
            org: self.org,
            lat: self.lat,
            lon: self.lon,
            timezone: self.timezone,
            asn: self.asn.filter(|a| !a.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> NexusClient {
        NexusClient::builder()
            .geo_base_url(server.uri())
            .geo_timeout(Duration::from_millis(500))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_locate_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/8.8.8.8"))
            .and(query_param("fields", GEO_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "country": "United States",
                "countryCode": "US",
                "city": "Ashburn",
                "isp": "Google LLC",
                "org": "Google Public DNS",
                "lat": 39.03,
                "lon": -77.5,
                "timezone": "America/New_York",
                "as": "AS15169 Google LLC"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let geo = client_for(&server)
            .await
            .locate(Ipv4Addr::new(8, 8, 8, 8))
            .await
            .unwrap();

        assert_eq!(geo.country_code.as_deref(), Some("US"));
        assert_eq!(geo.city.as_deref(), Some("Ashburn"));
        assert_eq!(geo.asn.as_deref(), Some("AS15169 Google LLC"));
        assert_eq!(geo.coordinates(), Some((39.03, -77.5)));
    }

    #[tokio::test]
    async fn test_provider_failure_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/10.0.0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .locate(Ipv4Addr::new(10, 0, 0, 1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("private range"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .locate(Ipv4Addr::new(1, 1, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, NexusError::Json(_)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "success" }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .locate(Ipv4Addr::new(1, 1, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, NexusError::Timeout(_)));
    }
}
