use super::{PeriodLabel, RatingCategory};

/// Normalized score of one category within one day or week bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodScore {
    pub category: RatingCategory,
    pub period: PeriodLabel,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: RatingCategory,
    pub count: i64,
}

/// Aggregate score of one ticket for one category over a whole range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketScore {
    pub ticket_id: i64,
    pub category: RatingCategory,
    pub score: i32,
}

/// `second - first` score change of a category between two ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDiff {
    pub category: RatingCategory,
    pub diff: i32,
}
