use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::RangeError;
use crate::models::{CategoryCount, CategoryDiff, Granularity, PeriodScore, TicketScore, TimeRange};

/// A single reporting period given as two `YYYY-MM-DD` dates, both inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimePeriodQuery {
    /// First day of the period
    #[param(example = "2019-03-01")]
    pub from: String,
    /// Last day of the period
    #[param(example = "2019-03-31")]
    pub to: String,
}

impl TimePeriodQuery {
    pub fn validate(&self) -> Result<TimeRange, RangeError> {
        TimeRange::parse(&self.from, &self.to)
    }
}

/// Two independent periods to compare. They may overlap or be identical.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodOverPeriodQuery {
    #[param(example = "2019-03-01")]
    pub first_from: String,
    #[param(example = "2019-03-31")]
    pub first_to: String,
    #[param(example = "2019-04-01")]
    pub second_from: String,
    #[param(example = "2019-04-30")]
    pub second_to: String,
}

impl PeriodOverPeriodQuery {
    pub fn validate(&self) -> Result<(TimeRange, TimeRange), RangeError> {
        let first = TimeRange::parse_fields(
            ("first_from", &self.first_from),
            ("first_to", &self.first_to),
        )?;
        let second = TimeRange::parse_fields(
            ("second_from", &self.second_from),
            ("second_to", &self.second_to),
        )?;
        Ok((first, second))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PeriodScoreEntry {
    pub category_id: i64,
    pub category_name: String,
    /// `YYYY-MM-DD` for daily buckets, `YYYY-Www` (ISO week) for weekly ones
    pub period: String,
    pub score: i32,
}

impl From<PeriodScore> for PeriodScoreEntry {
    fn from(score: PeriodScore) -> Self {
        Self {
            category_id: score.category.id,
            category_name: score.category.name,
            period: score.period.to_string(),
            score: score.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountEntry {
    pub category_id: i64,
    pub category_name: String,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountEntry {
    fn from(count: CategoryCount) -> Self {
        Self {
            category_id: count.category.id,
            category_name: count.category.name,
            count: count.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryScoresResponse {
    pub granularity: Granularity,
    pub scores: Vec<PeriodScoreEntry>,
    pub counts: Vec<CategoryCountEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TicketScoreEntry {
    pub ticket_id: i64,
    pub category_name: String,
    pub score: i32,
}

impl From<TicketScore> for TicketScoreEntry {
    fn from(score: TicketScore) -> Self {
        Self {
            ticket_id: score.ticket_id,
            category_name: score.category.name,
            score: score.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketScoresResponse {
    pub categories: Vec<String>,
    pub scores: Vec<TicketScoreEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OverallScoreResponse {
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDiffEntry {
    pub category_id: i64,
    pub category_name: String,
    /// Score of the second period minus score of the first
    pub diff: i32,
}

impl From<CategoryDiff> for CategoryDiffEntry {
    fn from(diff: CategoryDiff) -> Self {
        Self {
            category_id: diff.category.id,
            category_name: diff.category.name,
            diff: diff.diff,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PeriodOverPeriodResponse {
    pub changes: Vec<CategoryDiffEntry>,
}
