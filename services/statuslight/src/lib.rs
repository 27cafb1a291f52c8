//! Status Light - uptime status indicator service
//!
//! Polls Uptime Kuma `/metrics` endpoints, aggregates their monitor states, and
//! renders the verdict on two indicator lights.

pub mod admin;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod io;
pub mod metrics;
pub mod output;
pub mod poller;
pub mod state;
pub mod store;
pub mod verdict;

pub use config::{load_config, Config};
pub use error::{Result, StatusLightError};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::admin::AdminState;
use crate::engine::Engine;
use crate::indicator::TickLoop;
use crate::io::ReqwestHttpClient;
use crate::poller::EndpointPoller;
use crate::store::{ConfigStore, EndpointSource};

/// How a call to [`run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Ctrl-C; the process should stop
    Shutdown,
    /// Restart requested through the admin interface; reload and run again
    Restart,
}

/// Run the status light service until Ctrl-C or an admin restart request.
///
/// `config_path`, when given, receives every configuration edit made through
/// the admin interface.
pub async fn run(config: Config, config_path: Option<PathBuf>) -> Result<Exit> {
    config.validate()?;
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new()?);
    let cancel = CancellationToken::new();
    let restart = CancellationToken::new();

    let indicator_config = config.indicator.clone();
    let admin_config = config.admin.clone();
    let store = Arc::new(ConfigStore::new(config, config_path));

    // Shared state
    let indicator = indicator::new_indicator_handle();
    let status = state::new_status_handle();

    // Lamp test before anything is rendered
    let output = output::build_output(&indicator_config.output);
    if let Err(e) = output::self_test(
        output.as_ref(),
        Duration::from_millis(indicator_config.self_test_ms),
    )
    .await
    {
        tracing::warn!("Indicator self test failed: {}", e);
    }

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    let restart_for_signal = restart.clone();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
            },
            _ = restart_for_signal.cancelled() => tracing::info!("Restart requested"),
            _ = cancel_for_signal.cancelled() => return,
        }
        cancel_for_signal.cancel();
    });

    // Indicator tick loop, independent of the poll cadence
    let tick_loop = TickLoop::new(
        Arc::clone(&indicator),
        Arc::clone(&output),
        Duration::from_millis(indicator_config.tick_interval_ms),
        indicator_config.blink_interval_ms,
    );
    let tick_handle = tokio::spawn(tick_loop.run(cancel.clone()));

    // Start admin interface if enabled
    if admin_config.enabled {
        if admin_config.credentials().is_none() {
            tracing::warn!("Admin interface has no credentials configured, authentication is off");
        }
        let admin_port = admin_config.port;
        let admin_state = AdminState::new(
            Arc::clone(&store),
            Arc::clone(&status),
            Arc::clone(&indicator),
            admin_config.credentials(),
            restart.clone(),
        );
        let cancel_for_admin = cancel.clone();

        tokio::spawn(async move {
            let addr = SocketAddr::from(([0, 0, 0, 0], admin_port));
            match admin::serve(admin_state, addr, cancel_for_admin).await {
                Ok(()) => tracing::debug!("Admin interface stopped"),
                Err(e) => tracing::error!("{}. Continuing without it.", e),
            }
        });
    }

    // Build engine
    let engine = Engine::new(
        Arc::clone(&store) as Arc<dyn EndpointSource>,
        EndpointPoller::new(http),
        Arc::clone(&indicator),
        Arc::clone(&status),
        cancel.clone(),
    );

    tracing::info!("Status light engine started");

    // Run the engine (blocks until cancelled)
    engine.run(store.startup_delay().await).await;

    if let Err(e) = tick_handle.await {
        tracing::warn!("Indicator tick loop ended abnormally: {}", e);
    }
    for channel in indicator::Channel::ALL {
        if let Err(e) = output.set(channel, false) {
            tracing::warn!("Failed to clear {} indicator: {}", channel, e);
        }
    }
    tracing::info!("Status light engine stopped");

    if restart.is_cancelled() {
        Ok(Exit::Restart)
    } else {
        Ok(Exit::Shutdown)
    }
}
