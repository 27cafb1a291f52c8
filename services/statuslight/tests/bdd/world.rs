//! BDD test world for the status light service

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cucumber::World;
use statuslight::config::Endpoint;
use statuslight::indicator::{ChannelState, IndicatorHandle, IndicatorState};
use statuslight::io::{HttpClient, HttpResponse};
use statuslight::metrics::StatusCounts;
use statuslight::poller::EndpointResult;
use statuslight::store::ConfigStore;
use statuslight::verdict::AggregateVerdict;

/// Fake monitoring instances keyed by host; a `None` body means unreachable
#[derive(Debug, Default)]
pub struct FakeKuma {
    pub bodies: Mutex<HashMap<String, Option<String>>>,
    pub requested: Mutex<Vec<String>>,
    /// Applied to `store` while the first request of the run is in flight
    pub replacement: Mutex<Option<(Arc<ConfigStore>, Vec<Endpoint>)>>,
}

impl FakeKuma {
    pub fn requested_hosts(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpClient for FakeKuma {
    async fn get(&self, url: &str, _authorization: &str) -> statuslight::Result<HttpResponse> {
        let host = url
            .trim_start_matches("http://")
            .trim_end_matches("/metrics")
            .to_string();
        self.requested.lock().unwrap().push(host.clone());

        let replacement = self.replacement.lock().unwrap().take();
        if let Some((store, endpoints)) = replacement {
            store.replace_endpoints(endpoints).await?;
        }

        let body = self.bodies.lock().unwrap().get(&host).cloned().flatten();
        match body {
            Some(body) => Ok(HttpResponse { status: 200, body }),
            None => Err(statuslight::StatusLightError::Http(format!(
                "connect to {} refused",
                host
            ))),
        }
    }
}

#[derive(Debug, Default, World)]
pub struct StatusLightWorld {
    // Parsing
    pub payload: Option<String>,
    pub counts: Option<StatusCounts>,

    // Aggregation
    pub results: Vec<EndpointResult>,
    pub verdict: Option<AggregateVerdict>,

    // Poll cycle
    pub endpoints: Vec<Endpoint>,
    pub kuma: Arc<FakeKuma>,
    pub store: Option<Arc<ConfigStore>>,
    pub indicator: Option<IndicatorHandle>,
    pub indicator_before: Option<IndicatorState>,

    // Indicator
    pub channel: Option<ChannelState>,
    pub blink_start: u32,
    pub blink_interval: u32,
    pub toggles: u32,
}
