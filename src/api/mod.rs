//! HTTP surface: streamable MCP transport plus a health probe.

mod handlers;

use axum::{routing::get, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::mcp::McpServer;
use crate::store::RuleStore;

/// Build the router serving `/mcp` and `/health`.
///
/// Every MCP session gets its own [`McpServer`] handle over the shared store;
/// the session registry creates one on `initialize` and drops it on close.
pub fn create_router(store: RuleStore) -> Router {
    let server = McpServer::new(store);

    let mcp_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .nest_service("/mcp", mcp_service)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
