//! HTTP server fingerprinting with a single HEAD request.

use crate::client::{map_transport_error, NexusClient};
use async_trait::async_trait;
use nexus_core::{HttpHeaders, Result, HIDDEN_HEADER};
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE, SERVER, STRICT_TRANSPORT_SECURITY, X_FRAME_OPTIONS};
use tracing::{debug, instrument};

/// Source of HTTP server fingerprints
#[async_trait]
pub trait Fingerprint: Send + Sync {
    /// Issue a HEAD request to `url`, following redirects
    async fn fingerprint(&self, url: &str) -> Result<HttpHeaders>;
}

#[async_trait]
impl Fingerprint for NexusClient {
    #[instrument(skip(self))]
    async fn fingerprint(&self, url: &str) -> Result<HttpHeaders> {
        let timeout = self.fingerprint_timeout();
        let response = self
            .http()
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(&e, timeout))?;

        let status = response.status();
        debug!(status = status.as_u16(), final_url = %response.url(), "HEAD response");

        Ok(extract_headers(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            response.headers(),
        ))
    }
}

fn extract_headers(status: u16, status_text: &str, headers: &HeaderMap) -> HttpHeaders {
    let header = |name: &HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    HttpHeaders {
        status,
        status_text: status_text.to_string(),
        server: header(&SERVER).unwrap_or_else(|| HIDDEN_HEADER.to_string()),
        powered_by: header(&HeaderName::from_static("x-powered-by"))
            .unwrap_or_else(|| HIDDEN_HEADER.to_string()),
        content_type: header(&CONTENT_TYPE),
        hsts: headers.contains_key(STRICT_TRANSPORT_SECURITY),
        x_frame_options: header(&X_FRAME_OPTIONS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::NexusError;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(timeout: Duration) -> NexusClient {
        NexusClient::builder()
            .fingerprint_timeout(timeout)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fingerprint_headers() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("server", "nginx/1.25.3")
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .insert_header("strict-transport-security", "max-age=63072000")
                    .insert_header("x-frame-options", "DENY"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let headers = client(Duration::from_secs(2))
            .fingerprint(&format!("{}/", server.uri()))
            .await
            .unwrap();

        assert_eq!(headers.status, 200);
        assert_eq!(headers.status_text, "OK");
        assert_eq!(headers.server, "nginx/1.25.3");
        assert_eq!(headers.powered_by, "Hidden");
        assert_eq!(headers.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert!(headers.hsts);
        assert_eq!(headers.x_frame_options.as_deref(), Some("DENY"));
    }

    #[tokio::test]
    async fn test_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(204).insert_header("x-powered-by", "Express"))
            .mount(&server)
            .await;

        let headers = client(Duration::from_secs(2))
            .fingerprint(&format!("{}/old", server.uri()))
            .await
            .unwrap();

        assert_eq!(headers.status, 204);
        assert_eq!(headers.powered_by, "Express");
        assert_eq!(headers.server, "Hidden");
        assert!(!headers.hsts);
    }

    #[tokio::test]
    async fn test_hard_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let err = client(Duration::from_millis(200))
            .fingerprint(&server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, NexusError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Port 9 (discard) is almost never listening on loopback
        let result = client(Duration::from_secs(1))
            .fingerprint("http://127.0.0.1:9/")
            .await;
        assert!(result.is_err());
    }
}
