use storage::{
    ScoreStore,
    dto::scores::{
        CategoryScoresResponse, OverallScoreResponse, PeriodOverPeriodResponse,
        TicketScoresResponse,
    },
    error::Result,
    models::{Granularity, TimeRange},
    services::scoring,
};

/// Per category scores bucketed by day, or by ISO week for ranges longer
/// than a month, together with the number of ratings per category.
pub async fn category_scores(
    store: &dyn ScoreStore,
    range: &TimeRange,
) -> Result<CategoryScoresResponse> {
    let granularity = scoring::granularity_for(range);

    let scores = match granularity {
        Granularity::Day => store.daily_scores(range).await?,
        Granularity::Week => store.weekly_scores(range).await?,
    };
    let counts = store.rating_counts(range).await?;

    Ok(CategoryScoresResponse {
        granularity,
        scores: scores.into_iter().map(Into::into).collect(),
        counts: counts.into_iter().map(Into::into).collect(),
    })
}

/// Aggregate category scores of every ticket created within the range
pub async fn ticket_scores(store: &dyn ScoreStore, range: &TimeRange) -> Result<TicketScoresResponse> {
    let scores = store.ticket_scores(range).await?;
    let categories = store.rating_categories().await?;

    Ok(TicketScoresResponse {
        categories,
        scores: scores.into_iter().map(Into::into).collect(),
    })
}

pub async fn overall_score(store: &dyn ScoreStore, range: &TimeRange) -> Result<OverallScoreResponse> {
    let score = store.overall_score(range).await?;
    Ok(OverallScoreResponse { score })
}

/// Score change per category from the first period to the second
pub async fn period_over_period(
    store: &dyn ScoreStore,
    first: &TimeRange,
    second: &TimeRange,
) -> Result<PeriodOverPeriodResponse> {
    let changes = store.period_over_period(first, second).await?;

    Ok(PeriodOverPeriodResponse {
        changes: changes.into_iter().map(Into::into).collect(),
    })
}
