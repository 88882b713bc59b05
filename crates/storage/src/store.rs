use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CategoryCount, CategoryDiff, Granularity, PeriodScore, RatingCategory, RatingSample,
    TicketScore, TimeRange,
};
use crate::services::scoring;

/// Capability set a backing store offers to the reporting layer.
///
/// Backends implement the two raw fetches. The score operations are provided
/// on top of them and route through [`scoring`], so two backends holding the
/// same rows always answer identically.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// All ratings of tickets created on a day inside `range`, in any order.
    async fn ratings(&self, range: &TimeRange) -> Result<Vec<RatingSample>>;

    /// Every known rating category, in any order.
    async fn categories(&self) -> Result<Vec<RatingCategory>>;

    /// Releases connections. Called once at shutdown.
    async fn close(&self) {}

    async fn daily_scores(&self, range: &TimeRange) -> Result<Vec<PeriodScore>> {
        let samples = self.ratings(range).await?;
        Ok(scoring::period_scores(&samples, Granularity::Day))
    }

    async fn weekly_scores(&self, range: &TimeRange) -> Result<Vec<PeriodScore>> {
        let samples = self.ratings(range).await?;
        Ok(scoring::period_scores(&samples, Granularity::Week))
    }

    async fn rating_counts(&self, range: &TimeRange) -> Result<Vec<CategoryCount>> {
        let samples = self.ratings(range).await?;
        Ok(scoring::rating_counts(&samples))
    }

    async fn ticket_scores(&self, range: &TimeRange) -> Result<Vec<TicketScore>> {
        let samples = self.ratings(range).await?;
        Ok(scoring::ticket_scores(&samples))
    }

    async fn overall_score(&self, range: &TimeRange) -> Result<i32> {
        let samples = self.ratings(range).await?;
        Ok(scoring::overall_score(&samples))
    }

    async fn period_over_period(
        &self,
        first: &TimeRange,
        second: &TimeRange,
    ) -> Result<Vec<CategoryDiff>> {
        let first = self.ratings(first).await?;
        let second = self.ratings(second).await?;
        Ok(scoring::period_over_period(&first, &second))
    }

    /// Category names ordered by category id.
    async fn rating_categories(&self) -> Result<Vec<String>> {
        let categories = self.categories().await?;
        Ok(scoring::category_names(&categories))
    }
}
