use thiserror::Error;

/// Result type alias for upstream history operations
pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Errors raised while talking to the remote history API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Failed to decode commit history for {repo}: {source}")]
    Decode {
        repo: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("History request for {repo} returned HTTP {status}")]
    UnexpectedStatus { repo: String, status: u16 },

    #[error("Invalid repository slug: {slug}")]
    InvalidSlug { slug: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl UpstreamError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => format!("Request timed out: {e}"),
            Self::Http(e) => format!("Request failed: {e}"),
            Self::UnexpectedStatus { repo, status: 403 } => {
                format!("Access to {repo} was refused (rate limited or missing token)")
            }
            Self::UnexpectedStatus { repo, status: 404 } => {
                format!("Repository {repo} or the requested commit was not found")
            }
            _ => self.to_string(),
        }
    }
}
