use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use storage::ScoreStore;
use storage::models::TimeRange;
use storage::repository::{MemoryStore, PostgresStore, SqliteStore};

const CATEGORIES: &[(i64, &str, f64)] = &[
    (1, "Spelling", 1.0),
    (2, "Grammar", 0.7),
    (3, "GDPR", 1.2),
    (4, "Randomness", 0.0),
];

const TICKETS: &[(i64, &str)] = &[
    (100, "2019-02-28 23:59:59"),
    (101, "2019-03-01 00:00:00"),
    (102, "2019-03-01 14:20:00"),
    (103, "2019-03-05 09:00:00"),
    (104, "2019-03-31 23:10:00"),
    (105, "2019-04-02 08:00:00"),
    (106, "2019-05-20 12:00:00"),
];

const RATINGS: &[(i64, i64, i32)] = &[
    (100, 1, 2),
    (101, 1, 5),
    (101, 2, 4),
    (102, 1, 3),
    (102, 3, 0),
    (103, 2, 5),
    (103, 3, 4),
    (104, 1, 1),
    (104, 2, 2),
    (105, 2, 3),
    (105, 3, 5),
    (106, 1, 5),
    (106, 2, 5),
    (106, 3, 5),
];

fn timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn memory_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    for (id, name, weight) in CATEGORIES {
        store = store.with_category(*id, *name, *weight);
    }
    for (id, created_at) in TICKETS {
        store = store.with_ticket(*id, timestamp(created_at));
    }
    for (ticket_id, category_id, rating) in RATINGS {
        store = store.with_rating(*ticket_id, *category_id, *rating);
    }
    store
}

async fn sqlite_store() -> SqliteStore {
    let store = SqliteStore::connect("sqlite::memory:", 1).await.unwrap();
    store.run_migrations().await.unwrap();

    for (id, name, weight) in CATEGORIES {
        sqlx::query("INSERT INTO rating_categories (id, name, weight) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(weight)
            .execute(store.pool())
            .await
            .unwrap();
    }
    for (id, created_at) in TICKETS {
        sqlx::query("INSERT INTO tickets (id, subject, created_at) VALUES (?, 'subject', ?)")
            .bind(id)
            .bind(created_at)
            .execute(store.pool())
            .await
            .unwrap();
    }
    for (ticket_id, category_id, rating) in RATINGS {
        sqlx::query("INSERT INTO ratings (ticket_id, rating_category_id, rating) VALUES (?, ?, ?)")
            .bind(ticket_id)
            .bind(category_id)
            .bind(rating)
            .execute(store.pool())
            .await
            .unwrap();
    }
    store
}

async fn postgres_store(database_url: &str) -> PostgresStore {
    let store = PostgresStore::connect(database_url, 2).await.unwrap();
    store.run_migrations().await.unwrap();

    sqlx::query("TRUNCATE ratings, tickets, rating_categories RESTART IDENTITY CASCADE")
        .execute(store.pool())
        .await
        .unwrap();
    for (id, name, weight) in CATEGORIES {
        sqlx::query("INSERT INTO rating_categories (id, name, weight) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(weight)
            .execute(store.pool())
            .await
            .unwrap();
    }
    for (id, created_at) in TICKETS {
        sqlx::query("INSERT INTO tickets (id, subject, created_at) VALUES ($1, 'subject', $2)")
            .bind(id)
            .bind(timestamp(created_at))
            .execute(store.pool())
            .await
            .unwrap();
    }
    for (ticket_id, category_id, rating) in RATINGS {
        sqlx::query(
            "INSERT INTO ratings (ticket_id, rating_category_id, rating) VALUES ($1, $2, $3)",
        )
        .bind(ticket_id)
        .bind(category_id)
        .bind(rating)
        .execute(store.pool())
        .await
        .unwrap();
    }
    store
}

fn ranges() -> Vec<TimeRange> {
    [
        ("2019-03-01", "2019-03-01"),
        ("2019-03-01", "2019-03-31"),
        ("2019-03-01", "2019-04-01"),
        ("2019-02-01", "2019-06-30"),
        ("2020-01-01", "2020-01-31"),
    ]
    .iter()
    .map(|(from, to)| TimeRange::parse(from, to).unwrap())
    .collect()
}

async fn assert_same_answers(left: &dyn ScoreStore, right: &dyn ScoreStore) {
    for range in ranges() {
        assert_eq!(
            left.daily_scores(&range).await.unwrap(),
            right.daily_scores(&range).await.unwrap(),
            "daily scores for {range}"
        );
        assert_eq!(
            left.weekly_scores(&range).await.unwrap(),
            right.weekly_scores(&range).await.unwrap(),
            "weekly scores for {range}"
        );
        assert_eq!(
            left.rating_counts(&range).await.unwrap(),
            right.rating_counts(&range).await.unwrap(),
            "rating counts for {range}"
        );
        assert_eq!(
            left.ticket_scores(&range).await.unwrap(),
            right.ticket_scores(&range).await.unwrap(),
            "ticket scores for {range}"
        );
        assert_eq!(
            left.overall_score(&range).await.unwrap(),
            right.overall_score(&range).await.unwrap(),
            "overall score for {range}"
        );
        for second in ranges() {
            assert_eq!(
                left.period_over_period(&range, &second).await.unwrap(),
                right.period_over_period(&range, &second).await.unwrap(),
                "period over period {range} vs {second}"
            );
        }
    }
    assert_eq!(
        left.rating_categories().await.unwrap(),
        right.rating_categories().await.unwrap()
    );
}

#[tokio::test]
async fn sqlite_and_memory_backends_agree() {
    let sqlite = sqlite_store().await;
    let memory = memory_store();

    assert_same_answers(&sqlite, &memory).await;
    sqlite.close().await;
}

// Needs a disposable database: the rating tables are truncated before seeding.
// TEST_DATABASE_URL=postgres://... cargo test -p storage -- --ignored
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL pointing at a PostgreSQL database"]
async fn postgres_and_memory_backends_agree() {
    let database_url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL is not set");
    let postgres = postgres_store(&database_url).await;
    let memory = memory_store();

    assert_same_answers(&postgres, &memory).await;

    let range = TimeRange::parse("2019-03-31", "2019-03-31").unwrap();
    let total: i64 = postgres
        .rating_counts(&range)
        .await
        .unwrap()
        .iter()
        .map(|count| count.count)
        .sum();
    assert_eq!(total, 2);
    postgres.close().await;
}

#[tokio::test]
async fn fixture_file_matches_seeded_data() {
    let fixture = MemoryStore::load(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/ratings.json"
    ))
    .unwrap();
    let sqlite = sqlite_store().await;

    assert_same_answers(&fixture, &sqlite).await;
    sqlite.close().await;
}

#[tokio::test]
async fn sqlite_range_covers_whole_end_day() {
    let sqlite = sqlite_store().await;
    let range = TimeRange::parse("2019-03-31", "2019-03-31").unwrap();

    let counts = sqlite.rating_counts(&range).await.unwrap();
    let total: i64 = counts.iter().map(|count| count.count).sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn rating_categories_are_ordered_by_id() {
    let memory = memory_store();
    assert_eq!(
        memory.rating_categories().await.unwrap(),
        vec!["Spelling", "Grammar", "GDPR", "Randomness"]
    );
}

#[tokio::test]
async fn scored_categories_match_rated_categories() {
    let memory = memory_store();
    let known: BTreeSet<String> = memory.rating_categories().await.unwrap().into_iter().collect();

    for range in ranges() {
        let counted: BTreeSet<String> = memory
            .rating_counts(&range)
            .await
            .unwrap()
            .into_iter()
            .filter(|count| count.count > 0)
            .map(|count| count.category.name)
            .collect();
        let daily: BTreeSet<String> = memory
            .daily_scores(&range)
            .await
            .unwrap()
            .into_iter()
            .map(|score| score.category.name)
            .collect();
        let weekly: BTreeSet<String> = memory
            .weekly_scores(&range)
            .await
            .unwrap()
            .into_iter()
            .map(|score| score.category.name)
            .collect();

        assert_eq!(counted, daily, "daily categories for {range}");
        assert_eq!(counted, weekly, "weekly categories for {range}");
        assert!(counted.is_subset(&known));
    }
}

#[tokio::test]
async fn identical_periods_have_no_change() {
    let memory = memory_store();
    for range in ranges() {
        let counted = memory.rating_counts(&range).await.unwrap();
        let diffs = memory.period_over_period(&range, &range).await.unwrap();

        assert_eq!(diffs.len(), counted.len());
        assert!(diffs.iter().all(|diff| diff.diff == 0));
    }
}

#[tokio::test]
async fn empty_range_scores_zero_and_omits_rows() {
    let memory = memory_store();
    let range = TimeRange::new(
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
    )
    .unwrap();

    assert_eq!(memory.overall_score(&range).await.unwrap(), 0);
    assert!(memory.daily_scores(&range).await.unwrap().is_empty());
    assert!(memory.rating_counts(&range).await.unwrap().is_empty());
    assert!(memory.ticket_scores(&range).await.unwrap().is_empty());
}
