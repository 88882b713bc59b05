use axum::{Router, routing::get};

use super::handlers::{healthcheck, metrics, readiness};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness))
        .route("/metrics", get(metrics))
}
