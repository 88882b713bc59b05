use storage::error::RangeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to encode JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidRange(#[from] RangeError),

    #[error("Server responded with {status}: {message}")]
    Api { status: u16, message: String },
}
