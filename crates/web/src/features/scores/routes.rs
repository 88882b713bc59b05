use axum::{Router, routing::get};

use super::handlers::{
    get_category_scores, get_overall_score, get_period_over_period, get_ticket_scores,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_category_scores))
        .route("/tickets", get(get_ticket_scores))
        .route("/overall", get(get_overall_score))
        .route("/period-over-period", get(get_period_over_period))
}
