//! Supporter registry: one JSON endpoint keeping a deduplicated, rate-limited
//! list of supporter names in a remote REST key-value store.
//!
//! The process holds no supporter data of its own. Counters, the dedupe set
//! and the list all live behind [`store::SupporterStore`].

use axum::{
    Router,
    routing::{any, get},
};
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod store;

use handlers::{health_handler, metrics_handler, supporters_handler};
use state::AppState;

pub const SUPPORTERS_PATH: &str = "/api/supporters";

// creating the router with routes
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(SUPPORTERS_PATH, any(supporters_handler)) // method dispatch happens in the handler
        .with_state(state)
}
