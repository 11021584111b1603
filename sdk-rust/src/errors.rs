use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The endpoint configuration is incomplete (e.g. missing base URL or
    /// API key). Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The provider returned a non-success status code.
    #[error("{provider} API error (status {status}): {body}\nRequest URL: {url}")]
    StatusCode {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
        url: String,
    },
    /// The request could not be sent or the response body could not be read.
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The response shape is not one the provider is known to return. The
    /// detail carries a truncated dump of the raw response.
    #[error("Unrecognized {0} response: {1}")]
    Format(&'static str, String),
    /// An asynchronous generation task reported failure.
    #[error("{provider} task {task_id} failed: {message}")]
    TaskFailed {
        provider: &'static str,
        task_id: String,
        message: String,
    },
    /// An asynchronous generation task did not finish within its poll budget.
    #[error("{provider} task {task_id} timed out after {attempts} polls")]
    Timeout {
        provider: &'static str,
        task_id: String,
        attempts: usize,
    },
}

impl GatewayError {
    /// Whether a retry policy may attempt the call again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Configuration(_) | Self::InvalidInput(_))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
