//! Indicator state machine and its fixed-rate tick loop
//!
//! Each channel has an intent layer (written after every poll cycle) and a
//! phase layer (advanced only by the tick loop while the channel blinks).
//! Time is a `u32` millisecond counter that wraps; elapsed time is always
//! computed with `wrapping_sub`, so blinking stays regular across the wrap.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::output::IndicatorOutput;

/// A physical indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Lit when every endpoint reports all monitors up
    Health,
    /// Alert light: steady for down monitors, blinking for unreachable endpoints
    Connectivity,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Health, Channel::Connectivity];
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Health => write!(f, "health"),
            Channel::Connectivity => write!(f, "connectivity"),
        }
    }
}

/// What the aggregator wants a channel to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelIntent {
    Off,
    On,
    Blink,
}

/// Intent for both channels, written atomically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPattern {
    pub health: ChannelIntent,
    pub connectivity: ChannelIntent,
}

/// State of a single channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelState {
    pub steady_on: bool,
    pub blinking: bool,
    pub phase_on: bool,
    pub last_toggle: u32,
}

impl ChannelState {
    pub fn intent(&self) -> ChannelIntent {
        match (self.blinking, self.steady_on) {
            (true, _) => ChannelIntent::Blink,
            (false, true) => ChannelIntent::On,
            (false, false) => ChannelIntent::Off,
        }
    }

    /// Set the intent layer. Entering `Blink` starts lit and anchors the phase at `now`;
    /// re-asserting `Blink` keeps the running phase.
    pub fn set_intent(&mut self, intent: ChannelIntent, now: u32) {
        match intent {
            ChannelIntent::Blink => {
                if !self.blinking {
                    self.blinking = true;
                    self.phase_on = true;
                    self.last_toggle = now;
                }
                self.steady_on = false;
            }
            ChannelIntent::On => {
                self.blinking = false;
                self.steady_on = true;
            }
            ChannelIntent::Off => {
                self.blinking = false;
                self.steady_on = false;
            }
        }
    }

    /// Advance the phase layer; returns true if the phase flipped
    pub fn advance(&mut self, now: u32, blink_interval: u32) -> bool {
        if !self.blinking {
            return false;
        }
        if now.wrapping_sub(self.last_toggle) >= blink_interval {
            self.phase_on = !self.phase_on;
            self.last_toggle = now;
            return true;
        }
        false
    }

    /// The value the physical output should show
    pub fn output(&self) -> bool {
        if self.blinking {
            self.phase_on
        } else {
            self.steady_on
        }
    }
}

/// Rendered state of all indicator channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorState {
    pub health: ChannelState,
    pub connectivity: ChannelState,
    /// Counter value seen by the most recent tick
    pub last_tick: u32,
}

impl IndicatorState {
    pub fn channel(&self, channel: Channel) -> &ChannelState {
        match channel {
            Channel::Health => &self.health,
            Channel::Connectivity => &self.connectivity,
        }
    }

    /// Write the intent layer for both channels
    pub fn apply(&mut self, pattern: IndicatorPattern) {
        let now = self.last_tick;
        self.health.set_intent(pattern.health, now);
        self.connectivity.set_intent(pattern.connectivity, now);
    }

    /// Advance both phase layers to `now`
    pub fn tick(&mut self, now: u32, blink_interval: u32) {
        self.last_tick = now;
        self.health.advance(now, blink_interval);
        self.connectivity.advance(now, blink_interval);
    }

    /// Output values in `Channel::ALL` order
    pub fn outputs(&self) -> [bool; 2] {
        Channel::ALL.map(|channel| self.channel(channel).output())
    }
}

/// Thread-safe indicator state handle
pub type IndicatorHandle = Arc<RwLock<IndicatorState>>;

pub fn new_indicator_handle() -> IndicatorHandle {
    Arc::new(RwLock::new(IndicatorState::default()))
}

/// Millisecond counter since construction, truncated to `u32` (wraps after ~49.7 days)
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    start: Instant,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

/// `tokio::time::interval` panics on a zero period
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Drives the physical outputs from the shared state until cancelled
pub struct TickLoop {
    indicator: IndicatorHandle,
    output: Arc<dyn IndicatorOutput>,
    tick_interval: Duration,
    blink_interval: u32,
    clock: TickClock,
    rendered: Option<[bool; 2]>,
}

impl TickLoop {
    pub fn new(
        indicator: IndicatorHandle,
        output: Arc<dyn IndicatorOutput>,
        tick_interval: Duration,
        blink_interval: u32,
    ) -> Self {
        Self {
            indicator,
            output,
            tick_interval: tick_interval.max(MIN_TICK_INTERVAL),
            blink_interval,
            clock: TickClock::new(),
            rendered: None,
        }
    }

    /// Advance the state once and push changed channels to the output
    pub async fn tick(&mut self) {
        let now = self.clock.now_ms();
        let outputs = {
            let mut state = self.indicator.write().await;
            state.tick(now, self.blink_interval);
            state.outputs()
        };

        for (index, channel) in Channel::ALL.iter().enumerate() {
            let on = outputs[index];
            if self.rendered.map(|r| r[index]) == Some(on) {
                continue;
            }
            if let Err(e) = self.output.set(*channel, on) {
                tracing::warn!("Failed to set {} indicator: {}", channel, e);
            }
        }
        self.rendered = Some(outputs);
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => self.tick().await,
                _ = cancel.cancelled() => {
                    tracing::debug!("Indicator tick loop cancelled");
                    break;
                }
            }
        }
    }
}
