use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("failed to fetch {endpoint}: HTTP {status}")]
    Http {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no session token")]
    MissingToken,
}

impl ClientError {
    pub fn http(endpoint: &'static str, status: reqwest::StatusCode) -> Self {
        Self::Http { endpoint, status }
    }

    /// Human-readable text for a notification banner, if the error has any.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Http { status, .. } => Some(match status.canonical_reason() {
                Some(reason) => format!("server responded with {} {}", status.as_u16(), reason),
                None => format!("server responded with {}", status.as_u16()),
            }),
            Self::Request(err) if err.is_timeout() => Some("the request timed out".to_string()),
            Self::Request(err) if err.is_connect() => {
                Some("could not reach the server".to_string())
            }
            Self::Request(_) | Self::Json(_) => None,
            Self::MissingToken => Some("you are not signed in".to_string()),
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Request(err) => err.status(),
            _ => None,
        }
    }
}
