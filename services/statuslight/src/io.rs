//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// Upper bound on a single metrics fetch, connect through body
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request carrying the given `Authorization` header value
    async fn get(&self, url: &str, authorization: &str) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
///
/// `https://` URLs go through a client that accepts any server certificate,
/// so the server is not authenticated.
pub struct ReqwestHttpClient {
    plain: reqwest::Client,
    insecure_tls: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> crate::Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let plain = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::StatusLightError::Http(format!("Building client: {}", e)))?;
        let insecure_tls = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| crate::StatusLightError::Http(format!("Building TLS client: {}", e)))?;
        Ok(Self {
            plain,
            insecure_tls,
        })
    }

    fn client_for(&self, url: &str) -> &reqwest::Client {
        if url.starts_with("https://") {
            &self.insecure_tls
        } else {
            &self.plain
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, authorization: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let response = self
            .client_for(url)
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| crate::StatusLightError::Http(format!("GET {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = read_body(url, response).await;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

/// Collect whatever body bytes arrive; a status line was already received, so a
/// broken or stalled body still counts as a response
async fn read_body(url: &str, mut response: reqwest::Response) -> String {
    let mut bytes = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(
                    "Reading body of {} failed after {} bytes: {}",
                    url,
                    bytes.len(),
                    e
                );
                break;
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
