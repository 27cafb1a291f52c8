//! Configuration store shared by the scheduler and the admin interface

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::config::{save_config, Config, Endpoint, WifiConfig};

/// What the poll scheduler needs from configuration
#[async_trait]
pub trait EndpointSource: Send + Sync {
    /// A snapshot of the endpoint list; later edits never change it
    async fn list_endpoints(&self) -> Vec<Endpoint>;

    /// Pause between the end of one cycle and the start of the next
    async fn poll_interval(&self) -> Duration;
}

/// In-memory configuration, optionally persisted to a JSON file on every edit
#[derive(Debug)]
pub struct ConfigStore {
    config: RwLock<Config>,
    path: Option<PathBuf>,
    /// Held from an edit until its file write finishes, so writes land in edit order
    persist_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(config: Config, path: Option<PathBuf>) -> Self {
        Self {
            config: RwLock::new(config),
            path,
            persist_lock: Mutex::new(()),
        }
    }

    pub async fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.config.read().await.startup_delay_seconds)
    }

    pub async fn wifi(&self) -> WifiConfig {
        self.config.read().await.wifi.clone()
    }

    pub async fn set_wifi(&self, wifi: WifiConfig) -> crate::Result<()> {
        let _persisting = self.persist_lock.lock().await;
        let updated = {
            let mut config = self.config.write().await;
            tracing::info!("Updating Wi-Fi settings for SSID '{}'", wifi.ssid);
            config.wifi = wifi;
            config.clone()
        };
        self.persist(&updated).await
    }

    /// Swap the whole endpoint list; cycles already running keep their snapshot
    pub async fn replace_endpoints(&self, endpoints: Vec<Endpoint>) -> crate::Result<()> {
        let _persisting = self.persist_lock.lock().await;
        let updated = {
            let mut config = self.config.write().await;
            tracing::info!(
                "Replacing endpoint list ({} -> {} endpoints)",
                config.endpoints.len(),
                endpoints.len()
            );
            config.endpoints = endpoints;
            config.clone()
        };
        self.persist(&updated).await
    }

    /// Runs with the config lock released; readers are never blocked on disk
    async fn persist(&self, config: &Config) -> crate::Result<()> {
        match &self.path {
            Some(path) => save_config(path, config).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EndpointSource for ConfigStore {
    async fn list_endpoints(&self) -> Vec<Endpoint> {
        self.config.read().await.endpoints.clone()
    }

    async fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.read().await.poll_interval_seconds)
    }
}
