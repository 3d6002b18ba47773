use thiserror::Error;

/// Where and how a payload diverged from its schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: expected {expected}, received {received}")]
pub struct SchemaMismatch {
    /// JSONPath-style location, e.g. `$.results[3].id`
    pub path: String,
    pub expected: &'static str,
    pub received: &'static str,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; decoding is never attempted
    #[error("TMDB API error: HTTP {status}")]
    Transport { status: u16 },

    #[error("Request could not be completed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Response body is not valid JSON: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Response does not match expected structure at {0}")]
    SchemaMismatch(SchemaMismatch),

    #[error("Response is not a list resource: {reason}")]
    UnrecoverableSchemaMismatch { reason: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            ApiError::SchemaMismatch(_) | ApiError::UnrecoverableSchemaMismatch { .. }
        )
    }

    /// HTTP status for transport failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<SchemaMismatch> for ApiError {
    fn from(mismatch: SchemaMismatch) -> Self {
        ApiError::SchemaMismatch(mismatch)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
