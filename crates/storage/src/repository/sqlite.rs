use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;
use crate::models::{RatingCategory, RatingSample, TimeRange};
use crate::store::ScoreStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (and creates if missing) the database file behind `database_url`.
    /// An in-memory database lives as long as its single pooled connection.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for SqliteStore {
    async fn ratings(&self, range: &TimeRange) -> Result<Vec<RatingSample>> {
        let samples = sqlx::query_as::<_, RatingSample>(
            r#"
            SELECT ratings.ticket_id,
                   rating_categories.id AS category_id,
                   rating_categories.name AS category_name,
                   rating_categories.weight,
                   ratings.rating,
                   date(tickets.created_at) AS created_on
            FROM ratings
            INNER JOIN tickets ON ratings.ticket_id = tickets.id
            INNER JOIN rating_categories ON ratings.rating_category_id = rating_categories.id
            WHERE tickets.created_at >= ?
              AND tickets.created_at < ?
            "#,
        )
        .bind(range.from())
        .bind(range.end_exclusive())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(%range, rows = samples.len(), "fetched ratings from sqlite");
        Ok(samples)
    }

    async fn categories(&self) -> Result<Vec<RatingCategory>> {
        let categories =
            sqlx::query_as::<_, RatingCategory>("SELECT id, name FROM rating_categories")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
