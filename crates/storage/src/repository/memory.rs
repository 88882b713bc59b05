use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{RatingCategory, RatingSample, TimeRange};
use crate::store::ScoreStore;

#[derive(Debug, Clone)]
struct CategoryRecord {
    name: String,
    weight: f64,
}

#[derive(Debug, Clone, Copy)]
struct RatingRecord {
    ticket_id: i64,
    category_id: i64,
    rating: i32,
}

#[derive(Debug, Deserialize)]
struct CategoryFixture {
    id: i64,
    name: String,
    #[serde(default)]
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct TicketFixture {
    id: i64,
    created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct RatingFixture {
    ticket_id: i64,
    category_id: i64,
    rating: i32,
}

/// Seed data for a [`MemoryStore`], as read from a JSON file.
#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    categories: Vec<CategoryFixture>,
    #[serde(default)]
    tickets: Vec<TicketFixture>,
    #[serde(default)]
    ratings: Vec<RatingFixture>,
}

/// Rating data held in process memory.
///
/// Seeded through the builder methods and read-only afterwards. Ratings
/// pointing at an unknown ticket or category are skipped, the same way an
/// inner join would drop them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: BTreeMap<i64, CategoryRecord>,
    tickets: HashMap<i64, NaiveDateTime>,
    ratings: Vec<RatingRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from JSON holding `categories`, `tickets` (with
    /// `created_at` as `YYYY-MM-DDTHH:MM:SS`) and `ratings`.
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;

        let mut store = Self::new();
        for category in fixture.categories {
            store = store.with_category(category.id, category.name, category.weight);
        }
        for ticket in fixture.tickets {
            store = store.with_ticket(ticket.id, ticket.created_at);
        }
        for rating in fixture.ratings {
            store = store.with_rating(rating.ticket_id, rating.category_id, rating.rating);
        }
        Ok(store)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_category(mut self, id: i64, name: impl Into<String>, weight: f64) -> Self {
        self.categories.insert(
            id,
            CategoryRecord {
                name: name.into(),
                weight,
            },
        );
        self
    }

    pub fn with_ticket(mut self, id: i64, created_at: NaiveDateTime) -> Self {
        self.tickets.insert(id, created_at);
        self
    }

    pub fn with_rating(mut self, ticket_id: i64, category_id: i64, rating: i32) -> Self {
        self.ratings.push(RatingRecord {
            ticket_id,
            category_id,
            rating,
        });
        self
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn ratings(&self, range: &TimeRange) -> Result<Vec<RatingSample>> {
        let samples = self
            .ratings
            .iter()
            .filter_map(|record| {
                let created_on = self.tickets.get(&record.ticket_id)?.date();
                if !range.contains(created_on) {
                    return None;
                }
                let category = self.categories.get(&record.category_id)?;
                Some(RatingSample {
                    ticket_id: record.ticket_id,
                    category_id: record.category_id,
                    category_name: category.name.clone(),
                    weight: category.weight,
                    rating: record.rating,
                    created_on,
                })
            })
            .collect();

        Ok(samples)
    }

    async fn categories(&self) -> Result<Vec<RatingCategory>> {
        Ok(self
            .categories
            .iter()
            .map(|(id, record)| RatingCategory::new(*id, record.name.clone()))
            .collect())
    }
}
