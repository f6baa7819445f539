use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {endpoint} failed with status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("Invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Superseded or unmounted requests end in `Cancelled`; callers must
    /// never surface those as failures.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

pub type AppResult<T> = Result<T, AppError>;
