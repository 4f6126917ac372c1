//! Switchboard Server: HTTP transport for the dispatch engine.
//!
//! Exposes a registry built by the application over HTTP:
//! - `POST /api/rpc`: JSON-RPC 2.0 method calls and notifications
//! - `GET /api/rpc/methods`: discovery of registered methods and resources
//! - `GET /api/health`: liveness and server info
//! - any other `GET` path: resource access by path template
//!
//! Registration happens before the server starts; this crate never
//! registers handlers itself.

pub mod api;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::Router;
use switchboard_core::{Dispatcher, HandlerRegistry, ParamErrorPolicy};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use self::state::{AppState, AppStateInner};

/// Configuration for the Switchboard HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request dispatch timeout.
    pub request_timeout: Duration,
    /// Wire code used for parameter-binding failures.
    pub param_error_policy: ParamErrorPolicy,
    /// Reported by the health endpoint.
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            param_error_policy: ParamErrorPolicy::default(),
            server_name: "switchboard".to_string(),
        }
    }
}

/// Create the shared `AppState` from a fully populated registry.
pub fn create_app_state(config: &ServerConfig, registry: Arc<HandlerRegistry>) -> AppState {
    let dispatcher = Dispatcher::new(registry).with_policy(config.param_error_policy);
    Arc::new(AppStateInner::new(
        dispatcher,
        config.server_name.clone(),
        config.request_timeout,
    ))
}

/// Build the full axum router over `state`.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::api_router())
        .route("/api/health", axum::routing::get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server over `registry`.
///
/// Returns the actual address the server is listening on; the serve loop
/// runs on a background task.
pub async fn start_server(
    config: ServerConfig,
    registry: Arc<HandlerRegistry>,
) -> Result<SocketAddr, String> {
    tracing::info!(
        "Starting {} server on {}:{}",
        config.server_name,
        config.host,
        config.port
    );

    let state = create_app_state(&config, registry);
    let app = build_router(state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("{} server listening on {}", config.server_name, local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": state.server_name,
        "version": env!("CARGO_PKG_VERSION"),
        "capabilities": ["methods", "resources"],
    }))
}
