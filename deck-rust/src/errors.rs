use slide_sdk::GatewayError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Model error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The page array could not be parsed even after repair.
    #[error("Failed to parse model response as JSON: {detail}\nResponse (first 500 chars): {excerpt}")]
    Parse { detail: String, excerpt: String },
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DeckResult<T> = Result<T, DeckError>;

/// A remote image could not be fetched. Never fatal: the generator passes the
/// remote URL through instead.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to download {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to download {url}: status {status}")]
    Status { url: String, status: u16 },
}

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;
