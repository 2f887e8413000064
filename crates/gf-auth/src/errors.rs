use thiserror::Error;

/// Gameforge launcher authentication error types
#[derive(Error, Debug)]
pub enum GfAuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Precondition failed: {0}")]
    Precondition(&'static str),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{endpoint} answered {actual} (expected {expected}): {body_snippet}")]
    RemoteRejection {
        endpoint: &'static str,
        expected: reqwest::StatusCode,
        actual: reqwest::StatusCode,
        body_snippet: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GfAuthError {
    /// Whether a caller may reasonably retry the same call later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::RemoteRejection { actual, .. } => actual.is_server_error(),
            _ => false,
        }
    }

    /// HTTP status returned by the remote side, if the error came from one
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::RemoteRejection { actual, .. } => Some(*actual),
            Self::Network(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GfAuthError>;
