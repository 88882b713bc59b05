use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use storage::dto::scores::{
    CategoryScoresResponse, OverallScoreResponse, PeriodOverPeriodQuery,
    PeriodOverPeriodResponse, TicketScoresResponse, TimePeriodQuery,
};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/scores/categories",
    params(TimePeriodQuery),
    responses(
        (status = 200, description = "Category scores bucketed by day, or by week for ranges longer than a month", body = CategoryScoresResponse),
        (status = 400, description = "Malformed or inverted date range"),
        (status = 500, description = "Storage unavailable")
    ),
    tag = "scores"
)]
pub async fn get_category_scores(
    State(state): State<AppState>,
    query: Result<Query<TimePeriodQuery>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(query) = query?;
    let range = query.validate()?;
    tracing::info!(%range, "category scores");

    let response = services::category_scores(state.store.as_ref(), &range).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scores/tickets",
    params(TimePeriodQuery),
    responses(
        (status = 200, description = "Category scores per ticket", body = TicketScoresResponse),
        (status = 400, description = "Malformed or inverted date range"),
        (status = 500, description = "Storage unavailable")
    ),
    tag = "scores"
)]
pub async fn get_ticket_scores(
    State(state): State<AppState>,
    query: Result<Query<TimePeriodQuery>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(query) = query?;
    let range = query.validate()?;
    tracing::info!(%range, "ticket scores");

    let response = services::ticket_scores(state.store.as_ref(), &range).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scores/overall",
    params(TimePeriodQuery),
    responses(
        (status = 200, description = "Overall quality score for the period", body = OverallScoreResponse),
        (status = 400, description = "Malformed or inverted date range"),
        (status = 500, description = "Storage unavailable")
    ),
    tag = "scores"
)]
pub async fn get_overall_score(
    State(state): State<AppState>,
    query: Result<Query<TimePeriodQuery>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(query) = query?;
    let range = query.validate()?;
    tracing::info!(%range, "overall score");

    let response = services::overall_score(state.store.as_ref(), &range).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scores/period-over-period",
    params(PeriodOverPeriodQuery),
    responses(
        (status = 200, description = "Score change per category between two periods", body = PeriodOverPeriodResponse),
        (status = 400, description = "Malformed or inverted date range"),
        (status = 500, description = "Storage unavailable")
    ),
    tag = "scores"
)]
pub async fn get_period_over_period(
    State(state): State<AppState>,
    query: Result<Query<PeriodOverPeriodQuery>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(query) = query?;
    let (first, second) = query.validate()?;
    tracing::info!(first = %first, second = %second, "period over period");

    let response = services::period_over_period(state.store.as_ref(), &first, &second).await?;

    Ok(Json(response).into_response())
}
