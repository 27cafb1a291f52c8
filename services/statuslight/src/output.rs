//! Physical indicator outputs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::OutputConfig;
use crate::indicator::Channel;

/// Sink for rendered channel values
#[cfg_attr(test, mockall::automock)]
pub trait IndicatorOutput: Send + Sync + std::fmt::Debug {
    /// Drive one channel on or off
    fn set(&self, channel: Channel, on: bool) -> crate::Result<()>;
}

/// Output that only logs, for hosts without indicator hardware
#[derive(Debug, Default)]
pub struct LogOutput;

impl IndicatorOutput for LogOutput {
    fn set(&self, channel: Channel, on: bool) -> crate::Result<()> {
        tracing::info!("[LED] {} {}", channel, if on { "on" } else { "off" });
        Ok(())
    }
}

/// GPIO lines exported through the Linux sysfs interface
#[derive(Debug)]
pub struct SysfsGpioOutput {
    gpio_root: PathBuf,
    health_pin: u32,
    connectivity_pin: u32,
}

impl SysfsGpioOutput {
    pub fn new(gpio_root: impl Into<PathBuf>, health_pin: u32, connectivity_pin: u32) -> Self {
        Self {
            gpio_root: gpio_root.into(),
            health_pin,
            connectivity_pin,
        }
    }

    fn value_path(&self, channel: Channel) -> PathBuf {
        let pin = match channel {
            Channel::Health => self.health_pin,
            Channel::Connectivity => self.connectivity_pin,
        };
        self.gpio_root.join(format!("gpio{}", pin)).join("value")
    }
}

impl IndicatorOutput for SysfsGpioOutput {
    fn set(&self, channel: Channel, on: bool) -> crate::Result<()> {
        let path = self.value_path(channel);
        std::fs::write(&path, if on { "1" } else { "0" }).map_err(|e| {
            crate::StatusLightError::Output(format!("Writing {:?}: {}", path, e))
        })
    }
}

/// Build the output selected in configuration
pub fn build_output(config: &OutputConfig) -> Arc<dyn IndicatorOutput> {
    match config {
        OutputConfig::Log => Arc::new(LogOutput),
        OutputConfig::SysfsGpio {
            gpio_root,
            health_pin,
            connectivity_pin,
        } => {
            tracing::debug!(
                "Using sysfs GPIO output at {} (health={}, connectivity={})",
                gpio_root,
                health_pin,
                connectivity_pin
            );
            Arc::new(SysfsGpioOutput::new(
                gpio_root,
                *health_pin,
                *connectivity_pin,
            ))
        }
    }
}

/// Lamp test: light every channel for `duration`, then switch all off
pub async fn self_test(output: &dyn IndicatorOutput, duration: Duration) -> crate::Result<()> {
    tracing::info!("Running indicator self test");
    for channel in Channel::ALL {
        output.set(channel, true)?;
    }
    tokio::time::sleep(duration).await;
    for channel in Channel::ALL {
        output.set(channel, false)?;
    }
    Ok(())
}
