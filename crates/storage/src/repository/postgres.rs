use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::Result;
use crate::models::{RatingCategory, RatingSample, TimeRange};
use crate::store::ScoreStore;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for PostgresStore {
    async fn ratings(&self, range: &TimeRange) -> Result<Vec<RatingSample>> {
        let samples = sqlx::query_as::<_, RatingSample>(
            r#"
            SELECT ratings.ticket_id,
                   rating_categories.id AS category_id,
                   rating_categories.name AS category_name,
                   rating_categories.weight,
                   ratings.rating,
                   CAST(tickets.created_at AS DATE) AS created_on
            FROM ratings
            INNER JOIN tickets ON ratings.ticket_id = tickets.id
            INNER JOIN rating_categories ON ratings.rating_category_id = rating_categories.id
            WHERE tickets.created_at >= $1
              AND tickets.created_at < $2
            "#,
        )
        .bind(range.from())
        .bind(range.end_exclusive())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(%range, rows = samples.len(), "fetched ratings from postgres");
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
