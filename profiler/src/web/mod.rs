//! HTTP server for the profiling API
//!
//! JSON endpoints for profile collection, summaries, comparisons, and notes.

pub mod api;
pub mod state;

use std::any::Any;
use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Configuration for the web server
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

/// Start the web server
pub async fn serve(config: WebConfig, state: AppState) -> Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let api_routes = Router::new()
        // GitHub data
        .route("/github", post(api::github_profile))
        // Summaries
        .route("/analyze", post(api::analyze))
        .route("/summary", post(api::summary))
        .route("/compare", post(api::compare))
        // Notes
        .route("/notes", get(api::list_notes).post(api::add_note))
        // Health
        .route("/health", get(api::health_check));

    Router::new()
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Convert a handler panic into the generic internal-error body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(api::ErrorResponse::new("Internal server error")),
    )
        .into_response()
}
