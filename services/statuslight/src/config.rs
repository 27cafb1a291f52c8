//! Configuration types for the status light service

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wifi: WifiConfig,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_startup_delay")]
    pub startup_delay_seconds: u64,
    #[serde(default, rename = "instances")]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    /// Reject timing values the scheduler and tick loop cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.poll_interval_seconds == 0 {
            return Err(crate::StatusLightError::Config(
                "poll_interval_seconds must be at least 1".to_string(),
            ));
        }
        if self.indicator.tick_interval_ms == 0 {
            return Err(crate::StatusLightError::Config(
                "indicator.tick_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.indicator.blink_interval_ms == 0 {
            return Err(crate::StatusLightError::Config(
                "indicator.blink_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wifi: WifiConfig::default(),
            poll_interval_seconds: default_poll_interval(),
            startup_delay_seconds: default_startup_delay(),
            endpoints: Vec::new(),
            indicator: IndicatorConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

/// Network credentials, stored for the network bootstrap collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

/// A remote monitoring instance exposing a `/metrics` page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Scheme, host and path prefix; `/metrics` is appended when polling
    #[serde(default, rename = "endpoint", alias = "base_url")]
    pub base_url: String,
    /// Sent as the Basic auth password with an empty user name
    #[serde(default, rename = "apikey", alias = "api_key")]
    pub api_key: String,
}

/// Indicator timing and output selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_blink_interval")]
    pub blink_interval_ms: u32,
    #[serde(default = "default_self_test")]
    pub self_test_ms: u64,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            blink_interval_ms: default_blink_interval(),
            self_test_ms: default_self_test(),
            output: OutputConfig::default(),
        }
    }
}

/// Physical output configuration with tagged enum for extensibility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputConfig {
    #[default]
    #[serde(rename = "log")]
    Log,
    #[serde(rename = "sysfs_gpio")]
    SysfsGpio {
        #[serde(default = "default_gpio_root")]
        gpio_root: String,
        #[serde(default = "default_health_pin")]
        health_pin: u32,
        #[serde(default = "default_connectivity_pin")]
        connectivity_pin: u32,
    },
}

/// Administrative web interface configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_admin_port")]
    pub port: u16,
    /// `null` here or in `password` disables authentication
    #[serde(default = "default_admin_username")]
    pub username: Option<String>,
    #[serde(default = "default_admin_password")]
    pub password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_admin_port(),
            username: default_admin_username(),
            password: default_admin_password(),
        }
    }
}

impl AdminConfig {
    /// Credentials are enforced only when both halves are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

fn default_poll_interval() -> u64 {
    15
}

fn default_startup_delay() -> u64 {
    5
}

fn default_tick_interval() -> u64 {
    50
}

fn default_blink_interval() -> u32 {
    500
}

fn default_self_test() -> u64 {
    1000
}

fn default_gpio_root() -> String {
    "/sys/class/gpio".to_string()
}

fn default_health_pin() -> u32 {
    22
}

fn default_connectivity_pin() -> u32 {
    23
}

fn default_true() -> bool {
    true
}

fn default_admin_username() -> Option<String> {
    Some("admin".to_string())
}

fn default_admin_password() -> Option<String> {
    Some("statuslight".to_string())
}

fn default_admin_port() -> u16 {
    8080
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::StatusLightError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Write configuration to a JSON file
pub async fn save_config(path: &Path, config: &Config) -> crate::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, content).await.map_err(|e| {
        crate::StatusLightError::Config(format!("Failed to write config file {:?}: {}", path, e))
    })?;
    tracing::debug!("Wrote configuration to {:?}", path);
    Ok(())
}
