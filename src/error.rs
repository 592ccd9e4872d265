use thiserror::Error;

/// Top-level error type for the storyeval harness.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Validation API error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures from the remote model provider. Never retried; propagated
/// to the evaluation caller as-is.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API request failed: {0}")]
    ApiRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited: retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },
}

/// Failures from the validation endpoint under test. The driver catches
/// these, logs them, and skips the evaluation run.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;
