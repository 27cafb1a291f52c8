//! Engine: the poll scheduler
//!
//! Each cycle takes a snapshot of the endpoint list, polls the endpoints one
//! after another, aggregates, and writes the indicator intent. Cancellation is
//! only observed while sleeping, so an in-flight cycle always completes.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::config::Endpoint;
use crate::indicator::IndicatorHandle;
use crate::poller::{EndpointPoller, EndpointResult};
use crate::state::StatusHandle;
use crate::store::EndpointSource;
use crate::verdict::{aggregate, AggregateVerdict};

/// The engine polls all endpoints on a fixed cadence and updates shared state
pub struct Engine {
    source: Arc<dyn EndpointSource>,
    poller: EndpointPoller,
    indicator: IndicatorHandle,
    status: StatusHandle,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        source: Arc<dyn EndpointSource>,
        poller: EndpointPoller,
        indicator: IndicatorHandle,
        status: StatusHandle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            poller,
            indicator,
            status,
            cancel,
        }
    }

    /// Poll every endpoint once and publish the verdict
    pub async fn run_cycle(&self) -> AggregateVerdict {
        let endpoints = self.source.list_endpoints().await;

        let mut polled: Vec<(Endpoint, EndpointResult, u64)> =
            Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            tracing::info!("Polling endpoint '{}'", endpoint.name);
            let result = self.poller.poll(&endpoint).await;
            log_summary(&endpoint, &result);
            polled.push((endpoint, result, current_epoch_ms()));
        }

        let results: Vec<EndpointResult> = polled.iter().map(|(_, result, _)| *result).collect();
        let verdict = aggregate(&results);

        match verdict.pattern() {
            Some(pattern) => self.indicator.write().await.apply(pattern),
            None => tracing::info!("No endpoints configured, skipping poll"),
        }

        let changed = self
            .status
            .write()
            .await
            .record_cycle(&polled, verdict, current_epoch_ms());
        if changed {
            tracing::info!("Status changed: {}", verdict);
        } else {
            tracing::debug!("Status unchanged: {}", verdict);
        }

        verdict
    }

    /// Wait `startup_delay`, then cycle until the cancellation token is triggered
    pub async fn run(&self, startup_delay: Duration) {
        tracing::debug!("Waiting {:?} before the first poll", startup_delay);
        tokio::select! {
            _ = tokio::time::sleep(startup_delay) => {}
            _ = self.cancel.cancelled() => return,
        }

        loop {
            self.run_cycle().await;

            let interval = self.source.poll_interval().await;
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }
}

fn log_summary(endpoint: &Endpoint, result: &EndpointResult) {
    tracing::info!(
        "Endpoint '{}': reachable={}, credential_accepted={}, up={}, down={}",
        endpoint.name,
        result.reachable,
        result.credential_accepted,
        result.up_count,
        result.down_count
    );
    if result.reachable && result.down_count > 0 {
        tracing::warn!(
            "Endpoint '{}' reports {} monitor(s) down",
            endpoint.name,
            result.down_count
        );
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
