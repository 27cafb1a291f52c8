//! Latest-cycle status for read-only consumers (admin UI, API)

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::Endpoint;
use crate::poller::EndpointResult;
use crate::verdict::AggregateVerdict;

/// Status of a single endpoint after the most recent cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub result: EndpointResult,
    pub last_poll_epoch_ms: u64,
}

/// Shared state written by the scheduler and read by the admin interface
#[derive(Debug)]
pub struct StatusBoard {
    pub endpoints: Vec<EndpointStatus>,
    pub verdict: Option<AggregateVerdict>,
    pub cycles: u64,
    pub last_cycle_epoch_ms: Option<u64>,
    pub started_at: Instant,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
            verdict: None,
            cycles: 0,
            last_cycle_epoch_ms: None,
            started_at: Instant::now(),
        }
    }

    /// Replace the board with one finished cycle. Returns true if the verdict changed.
    pub fn record_cycle(
        &mut self,
        polled: &[(Endpoint, EndpointResult, u64)],
        verdict: AggregateVerdict,
        now_ms: u64,
    ) -> bool {
        let changed = self.verdict != Some(verdict);
        self.endpoints = polled
            .iter()
            .map(|(endpoint, result, polled_at)| EndpointStatus {
                id: endpoint.id.clone(),
                name: endpoint.name.clone(),
                base_url: endpoint.base_url.clone(),
                result: *result,
                last_poll_epoch_ms: *polled_at,
            })
            .collect();
        self.verdict = Some(verdict);
        self.cycles += 1;
        self.last_cycle_epoch_ms = Some(now_ms);
        changed
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe status board handle
pub type StatusHandle = Arc<RwLock<StatusBoard>>;

pub fn new_status_handle() -> StatusHandle {
    Arc::new(RwLock::new(StatusBoard::new()))
}
