use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use storage::{
    dto::scores::{
        CategoryScoresResponse, OverallScoreResponse, PeriodOverPeriodResponse,
        TicketScoresResponse,
    },
    models::{DATE_FORMAT, TimeRange},
};

use crate::error::{CliError, Result};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin HTTP client over the scores API.
pub struct ScoresClient {
    base_url: String,
    client: reqwest::Client,
}

impl ScoresClient {
    pub fn new(addr: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("scores-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url(addr),
            client,
        })
    }

    pub async fn category_scores(&self, range: &TimeRange) -> Result<CategoryScoresResponse> {
        self.get("/api/scores/categories", &period_params("from", "to", range))
            .await
    }

    pub async fn ticket_scores(&self, range: &TimeRange) -> Result<TicketScoresResponse> {
        self.get("/api/scores/tickets", &period_params("from", "to", range))
            .await
    }

    pub async fn overall_score(&self, range: &TimeRange) -> Result<OverallScoreResponse> {
        self.get("/api/scores/overall", &period_params("from", "to", range))
            .await
    }

    pub async fn period_over_period(
        &self,
        first: &TimeRange,
        second: &TimeRange,
    ) -> Result<PeriodOverPeriodResponse> {
        let mut params = period_params("first_from", "first_to", first);
        params.extend(period_params("second_from", "second_to", second));

        self.get("/api/scores/period-over-period", &params).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?params, "Sending request");

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(api_error(status, &body));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Error for a non-success response, preferring the server's `error` message
/// over the bare status text.
fn api_error(status: StatusCode, body: &[u8]) -> CliError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };

    CliError::Api {
        status: status.as_u16(),
        message,
    }
}

fn period_params(
    from_key: &'static str,
    to_key: &'static str,
    range: &TimeRange,
) -> Vec<(&'static str, String)> {
    vec![
        (from_key, range.from().format(DATE_FORMAT).to_string()),
        (to_key, range.to().format(DATE_FORMAT).to_string()),
    ]
}

/// Accepts a bare `host:port` as well as a full url.
fn base_url(addr: &str) -> String {
    let addr = addr.trim().trim_end_matches('/');
    if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_string()
    } else {
        format!("http://{addr}")
    }
}
