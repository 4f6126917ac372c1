pub mod resources;
pub mod rpc;

use axum::Router;

use crate::state::AppState;

/// Build the API router: the JSON-RPC endpoint plus the resource fallback
/// for every path no other route claims.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/rpc", rpc::router())
        .fallback(resources::resource_handler)
}
