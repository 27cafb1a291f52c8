//! Fetches `/metrics` from one endpoint and classifies the outcome

use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::Endpoint;
use crate::io::HttpClient;
use crate::metrics;

/// Outcome of one fetch attempt against one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointResult {
    pub reachable: bool,
    /// Inferred from whether any `monitor_status` line came back. This is a
    /// payload-shape heuristic, not an authorization check.
    pub credential_accepted: bool,
    pub up_count: u32,
    pub down_count: u32,
}

impl Default for EndpointResult {
    fn default() -> Self {
        Self {
            reachable: false,
            credential_accepted: true,
            up_count: 0,
            down_count: 0,
        }
    }
}

impl EndpointResult {
    /// Result for a transport failure; the credential is not blamed
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Result for a response body that arrived, whatever the HTTP status
    pub fn from_payload(payload: &str) -> Self {
        let counts = metrics::parse(payload);
        Self {
            reachable: true,
            credential_accepted: counts.total() > 0,
            up_count: counts.up,
            down_count: counts.down,
        }
    }
}

/// Build the `Authorization` header value: Basic auth, empty user, key as password
///
/// An empty key still yields a header (`Basic Og==`).
pub fn basic_auth_header(api_key: &str) -> String {
    let credentials = format!(":{}", api_key);
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(credentials)
    )
}

/// Polls endpoints one request at a time through an injected HTTP client
#[derive(Clone)]
pub struct EndpointPoller {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for EndpointPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointPoller").finish_non_exhaustive()
    }
}

impl EndpointPoller {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Fetch and classify one endpoint. Never fails and never retries.
    pub async fn poll(&self, endpoint: &Endpoint) -> EndpointResult {
        let url = format!("{}/metrics", endpoint.base_url);
        let authorization = basic_auth_header(&endpoint.api_key);
        tracing::debug!("Polling '{}' at {}", endpoint.name, url);

        match self.http.get(&url, &authorization).await {
            Ok(response) => {
                if response.status != 200 {
                    tracing::debug!(
                        "Non-200 response from '{}': status={}",
                        endpoint.name,
                        response.status
                    );
                }
                EndpointResult::from_payload(&response.body)
            }
            Err(e) => {
                tracing::warn!("Endpoint '{}' unreachable: {}", endpoint.name, e);
                EndpointResult::unreachable()
            }
        }
    }
}
