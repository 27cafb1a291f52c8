//! Reduces one cycle's endpoint results to a single verdict

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::indicator::{ChannelIntent, IndicatorPattern};
use crate::poller::EndpointResult;

/// Aggregate status for one poll cycle, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateVerdict {
    NoEndpointsConfigured,
    AllUp,
    AnyDown,
    AnyUnreachable,
}

impl AggregateVerdict {
    /// The indicator pattern for this verdict. `None` leaves the indicator untouched.
    pub fn pattern(self) -> Option<IndicatorPattern> {
        match self {
            AggregateVerdict::AnyUnreachable => Some(IndicatorPattern {
                health: ChannelIntent::Off,
                connectivity: ChannelIntent::Blink,
            }),
            AggregateVerdict::AnyDown => Some(IndicatorPattern {
                health: ChannelIntent::Off,
                connectivity: ChannelIntent::On,
            }),
            AggregateVerdict::AllUp => Some(IndicatorPattern {
                health: ChannelIntent::On,
                connectivity: ChannelIntent::Off,
            }),
            AggregateVerdict::NoEndpointsConfigured => None,
        }
    }
}

impl fmt::Display for AggregateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateVerdict::NoEndpointsConfigured => write!(f, "No endpoints configured"),
            AggregateVerdict::AllUp => write!(f, "All up"),
            AggregateVerdict::AnyDown => write!(f, "Monitors down"),
            AggregateVerdict::AnyUnreachable => write!(f, "Endpoint unreachable"),
        }
    }
}

/// Rank a batch of results; unreachable beats down beats up
pub fn aggregate(results: &[EndpointResult]) -> AggregateVerdict {
    if results.is_empty() {
        return AggregateVerdict::NoEndpointsConfigured;
    }

    let mut verdict = AggregateVerdict::AllUp;
    for result in results {
        if !result.reachable {
            return AggregateVerdict::AnyUnreachable;
        }
        if result.down_count > 0 {
            verdict = AggregateVerdict::AnyDown;
        }
    }
    verdict
}
