//! # server
//!
//! JSON service over a trained air quality context. The context is built
//! before the router exists, so every request sees a fully trained engine.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use airquality_facade::{format_timestamp, AirQualityContext};

pub mod routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    context: Arc<AirQualityContext>,
}

impl AppState {
    pub fn new(context: AirQualityContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &AirQualityContext {
        &self.context
    }
}

/// Liveness probe - is the server running?
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - models are trained once the state exists
async fn readiness(State(state): State<AppState>) -> Json<serde_json::Value> {
    let context = state.context();
    let dataset = context.dataset();
    Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION"),
        "readings": dataset.len(),
        "earliest": dataset.earliest_timestamp().as_ref().map(format_timestamp),
        "latest": dataset.latest_timestamp().as_ref().map(format_timestamp),
        "horizon": context.horizon().get(),
        "orders": context.bank().orders(),
    }))
}

/// Build the router with middleware
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        // Legacy health endpoint
        .route("/health", get(liveness))
        // API endpoints
        .route("/api/v1/predict", post(routes::predict))
        .route("/api/v1/data", get(routes::data))
        .route("/api/v1/analysis", get(routes::analysis))
        // Middleware layers
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
