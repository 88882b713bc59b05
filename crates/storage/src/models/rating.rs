use chrono::NaiveDate;
use sqlx::FromRow;

use super::RatingCategory;

/// One raw rating joined with the creation day of its ticket and the weight
/// of its category. Backends produce these; scores are derived from them.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RatingSample {
    pub ticket_id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub weight: f64,
    pub rating: i32,
    pub created_on: NaiveDate,
}

impl RatingSample {
    pub fn category(&self) -> RatingCategory {
        RatingCategory::new(self.category_id, self.category_name.clone())
    }
}
