use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Reference data naming one rated aspect of a ticket. Ids are stable and
/// define the ordering of categories in every response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RatingCategory {
    pub id: i64,
    pub name: String,
}

impl RatingCategory {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
