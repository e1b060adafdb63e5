// rest/mod.rs — public REST API server.
//
// Endpoints:
//   GET  /ping
//   POST /analyze
//   POST /followup
//   POST /clear-chat

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/ping", get(routes::ping::ping))
        .route("/analyze", post(routes::analyze::analyze))
        .route("/followup", post(routes::followup::followup))
        .route("/clear-chat", post(routes::chat::clear_chat))
        // The service fronts a browser app on another origin.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
