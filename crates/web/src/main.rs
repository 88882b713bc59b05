use anyhow::Context;
use axum_prometheus::PrometheusMetricLayer;
use storage::{Database, redact_url};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod state;

use config::Config;
use features::{scores, system};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        scores::handlers::get_category_scores,
        scores::handlers::get_ticket_scores,
        scores::handlers::get_overall_score,
        scores::handlers::get_period_over_period,
        system::handlers::healthcheck,
        system::handlers::readiness,
    ),
    components(
        schemas(
            storage::dto::scores::CategoryScoresResponse,
            storage::dto::scores::PeriodScoreEntry,
            storage::dto::scores::CategoryCountEntry,
            storage::dto::scores::TicketScoresResponse,
            storage::dto::scores::TicketScoreEntry,
            storage::dto::scores::OverallScoreResponse,
            storage::dto::scores::PeriodOverPeriodResponse,
            storage::dto::scores::CategoryDiffEntry,
            storage::models::Granularity,
        )
    ),
    tags(
        (name = "scores", description = "Ticket rating quality scores"),
        (name = "system", description = "Liveness and readiness probes"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load API configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting ticket scores API");

    tracing::info!(
        "Connecting to database at: {}",
        redact_url(&config.database_url)
    );
    let db = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!(backend = db.backend(), "Database connection established");

    if config.run_migrations {
        tracing::info!("Running database migrations");
        db.run_migrations()
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations completed successfully");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let state = AppState::new(db.store()).with_metrics(prometheus_handle);

    let app = features::router(state.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(prometheus_layer)
                .layer(CorsLayer::permissive()),
        );

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    state.mark_ready();

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down, closing database connections");
    db.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
