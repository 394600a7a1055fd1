use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// Classify a reqwest failure so timeouts and refused connections are
    /// reported as such instead of as a generic request error.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProbeError::Timeout
        } else if error.is_connect() {
            ProbeError::Connect(error.to_string())
        } else {
            ProbeError::Http(error)
        }
    }

    pub fn is_connection_failure(&self) -> bool {
        matches!(self, ProbeError::Timeout | ProbeError::Connect(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ProbeError::Timeout => "TIMEOUT",
            ProbeError::Connect(_) => "CONNECT_ERROR",
            ProbeError::Http(_) => "HTTP_ERROR",
            ProbeError::InvalidUrl { .. } => "INVALID_URL",
        }
    }
}
