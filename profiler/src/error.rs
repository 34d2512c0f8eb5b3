//! Error types for the profiling pipeline
//!
//! Every failure the pipeline can surface is one [`ProfilerError`] variant.
//! Each variant carries a status class and a public message; upstream
//! response bodies stay in the `detail` field and are only logged.

use std::fmt;

use thiserror::Error;

/// External service an upstream failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    GitHub,
    Summarizer,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::GitHub => write!(f, "GitHub"),
            Service::Summarizer => write!(f, "summarizer"),
        }
    }
}

/// Errors produced by the fetch/enrich/summarize pipeline and the notes store
#[derive(Debug, Error)]
pub enum ProfilerError {
    /// Required input was missing or empty; rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// A credential or setting the pipeline needs is absent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The data source reports that the subject does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Transport failure or non-success status from an external service
    #[error("{service} request failed: {detail}")]
    Upstream { service: Service, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations
pub type ProfilerResult<T> = Result<T, ProfilerError>;

impl ProfilerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn upstream(service: Service, detail: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            detail: detail.into(),
        }
    }

    /// HTTP status code equivalent for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ProfilerError::Validation(_) => 400,
            ProfilerError::NotFound(_) => 404,
            ProfilerError::Configuration(_)
            | ProfilerError::Upstream { .. }
            | ProfilerError::Io(_)
            | ProfilerError::Json(_) => 500,
        }
    }

    /// Whether the caller is at fault (4xx class)
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Short message that is safe to hand to an end caller.
    ///
    /// Upstream details and I/O specifics are replaced with generic text.
    pub fn public_message(&self) -> String {
        match self {
            ProfilerError::Validation(msg) => msg.clone(),
            ProfilerError::Configuration(msg) => msg.clone(),
            ProfilerError::NotFound(_) => "User not found".to_string(),
            ProfilerError::Upstream {
                service: Service::GitHub,
                ..
            } => "GitHub fetch failed".to_string(),
            ProfilerError::Upstream {
                service: Service::Summarizer,
                ..
            } => "Summarization service failed".to_string(),
            ProfilerError::Io(_) | ProfilerError::Json(_) => "Internal server error".to_string(),
        }
    }
}
