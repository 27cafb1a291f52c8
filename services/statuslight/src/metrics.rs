//! Parser for the Prometheus text exposition served on `/metrics`
//!
//! Only `monitor_status{...} <code>` gauges are counted. Codes `2` (pending)
//! and `3` (maintenance) and anything unparsable are ignored; the parser
//! never fails.

const MONITOR_STATUS_PREFIX: &str = "monitor_status{";

/// Up/down tallies extracted from one metrics payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub up: u32,
    pub down: u32,
}

impl StatusCounts {
    pub fn total(&self) -> u32 {
        self.up.saturating_add(self.down)
    }
}

/// Count `monitor_status` gauges reporting up (1) and down (0)
pub fn parse(payload: &str) -> StatusCounts {
    let mut counts = StatusCounts::default();

    for line in payload.lines() {
        let line = line.trim();
        if !line.starts_with(MONITOR_STATUS_PREFIX) {
            continue;
        }

        let Some(brace_end) = line.find('}') else {
            continue;
        };

        match line[brace_end + 1..].trim().parse::<i64>() {
            Ok(0) => counts.down = counts.down.saturating_add(1),
            Ok(1) => counts.up = counts.up.saturating_add(1),
            _ => {}
        }
    }

    counts
}
