use axum::Router;

use crate::state::AppState;

pub mod scores;
pub mod system;

/// Every API and system route, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/scores", scores::routes::routes())
        .merge(system::routes::routes())
        .with_state(state)
}
