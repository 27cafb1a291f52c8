//! Administrative web interface: status pages and configuration editing

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::{Endpoint, WifiConfig};
use crate::indicator::IndicatorHandle;
use crate::state::StatusHandle;
use crate::store::{ConfigStore, EndpointSource};

/// Grace period between answering `/reboot` and shutting down
const RESTART_DELAY: Duration = Duration::from_secs(2);

/// Admin interface application state
#[derive(Clone)]
pub struct AdminState {
    pub store: Arc<ConfigStore>,
    pub status: StatusHandle,
    pub indicator: IndicatorHandle,
    /// Expected `Authorization` header value, if authentication is enabled
    pub authorization: Option<String>,
    pub restart: CancellationToken,
}

impl AdminState {
    pub fn new(
        store: Arc<ConfigStore>,
        status: StatusHandle,
        indicator: IndicatorHandle,
        credentials: Option<(&str, &str)>,
        restart: CancellationToken,
    ) -> Self {
        let authorization = credentials.map(|(user, pass)| {
            format!(
                "Basic {}",
                base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, pass))
            )
        });
        Self {
            store,
            status,
            indicator,
            authorization,
            restart,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct InstancesPayload {
    #[serde(default)]
    instances: Vec<Endpoint>,
}

/// Build the admin axum router
pub fn build_router(state: AdminState) -> Router {
    let protected = Router::new()
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/indicator", get(indicator_handler))
        .route("/wifi", get(get_wifi_handler).post(set_wifi_handler))
        .route(
            "/instances",
            get(get_instances_handler).post(set_instances_handler),
        )
        .route("/reboot", post(reboot_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(protected)
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind `addr` and serve the admin router until `shutdown` fires
pub async fn serve(
    state: AdminState,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        crate::StatusLightError::Admin(format!("Failed to bind admin interface to {}: {}", addr, e))
    })?;
    tracing::info!("Admin interface listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await
        .map_err(|e| crate::StatusLightError::Admin(format!("Admin interface failed: {}", e)))
}

async fn require_auth(State(admin): State<AdminState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &admin.authorization {
        let provided = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            tracing::debug!("Rejected unauthenticated request to {}", request.uri());
            return (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"statuslight\"")],
                "Unauthorized",
            )
                .into_response();
        }
    }
    next.run(request).await
}

async fn index_handler(State(admin): State<AdminState>) -> impl IntoResponse {
    let status = admin.status.read().await;
    let verdict = status
        .verdict
        .map(|v| v.to_string())
        .unwrap_or_else(|| "Waiting for first poll".to_string());

    let rows: String = status
        .endpoints
        .iter()
        .map(|e| {
            let (color, bg, label) = if !e.result.reachable {
                ("#721c24", "#f8d7da", "Unreachable")
            } else if e.result.down_count > 0 {
                ("#856404", "#fff3cd", "Down")
            } else {
                ("#155724", "#d4edda", "Up")
            };
            format!(
                r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">
                        <span style="padding: 0.25em 0.6em; border-radius: 0.25rem; font-weight: 600; color: {}; background-color: {};">{}</span>
                    </td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                </tr>"#,
                escape_html(&e.name),
                color,
                bg,
                label,
                e.result.up_count,
                e.result.down_count,
                if e.result.credential_accepted { "yes" } else { "no" }
            )
        })
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta http-equiv="refresh" content="10">
    <title>Status Light</title>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>Status Light</h1>
    <p>Current status: <strong>{verdict}</strong> (cycle {cycles})</p>
    <table style="width: 100%; border-collapse: collapse;">
        <thead>
            <tr style="border-bottom: 2px solid #dee2e6;">
                <th style="padding: 0.5rem; text-align: left;">Endpoint</th>
                <th style="padding: 0.5rem; text-align: left;">State</th>
                <th style="padding: 0.5rem; text-align: left;">Up</th>
                <th style="padding: 0.5rem; text-align: left;">Down</th>
                <th style="padding: 0.5rem; text-align: left;">Key OK</th>
            </tr>
        </thead>
        <tbody>{rows}</tbody>
    </table>
    <form method="post" action="/reboot"><button type="submit">Reboot</button></form>
</body>
</html>"#,
        verdict = verdict,
        cycles = status.cycles,
        rows = rows,
    );

    Html(html)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

async fn status_handler(State(admin): State<AdminState>) -> impl IntoResponse {
    let status = admin.status.read().await;
    axum::Json(serde_json::json!({
        "verdict": status.verdict,
        "cycles": status.cycles,
        "last_cycle_epoch_ms": status.last_cycle_epoch_ms,
        "uptime_seconds": status.started_at.elapsed().as_secs(),
        "endpoints": status.endpoints,
    }))
}

async fn indicator_handler(State(admin): State<AdminState>) -> impl IntoResponse {
    let snapshot = *admin.indicator.read().await;
    axum::Json(snapshot)
}

async fn get_wifi_handler(State(admin): State<AdminState>) -> impl IntoResponse {
    axum::Json(admin.store.wifi().await)
}

async fn set_wifi_handler(State(admin): State<AdminState>, body: String) -> Response {
    let wifi: WifiConfig = match serde_json::from_str(&body) {
        Ok(wifi) => wifi,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)).into_response(),
    };
    match admin.store.set_wifi(wifi).await {
        Ok(()) => (StatusCode::OK, "Config saved. Reboot to apply.").into_response(),
        Err(e) => {
            tracing::error!("Failed to save Wi-Fi settings: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn get_instances_handler(State(admin): State<AdminState>) -> impl IntoResponse {
    axum::Json(InstancesPayload {
        instances: admin.store.list_endpoints().await,
    })
}

async fn set_instances_handler(State(admin): State<AdminState>, body: String) -> Response {
    let payload: InstancesPayload = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)).into_response(),
    };
    match admin.store.replace_endpoints(payload.instances).await {
        Ok(()) => (StatusCode::OK, "Config saved.").into_response(),
        Err(e) => {
            tracing::error!("Failed to save endpoint list: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn reboot_handler(State(admin): State<AdminState>) -> impl IntoResponse {
    tracing::info!("Restart requested through admin interface");
    let restart = admin.restart.clone();
    tokio::spawn(async move {
        tokio::time::sleep(RESTART_DELAY).await;
        restart.cancel();
    });
    "Rebooting…"
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
