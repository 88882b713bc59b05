pub mod client;
pub mod error;
pub mod render;

pub use client::ScoresClient;
pub use error::{CliError, Result};
pub use render::OutputFormat;
