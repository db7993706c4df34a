use std::fmt;

use crate::constants::ERROR_BODY_LIMIT;

/// Custom error type for get-sentry-event-data operations
#[derive(Debug)]
pub enum SentryEventsError {
    /// Missing or invalid configuration (environment)
    Config(String),
    /// Missing or inconsistent command line input
    Validation(String),
    /// Non-2xx answer from the Sentry API
    Api {
        status: u16,
        url: String,
        body: String,
    },
    /// HTTP transport errors
    Http(reqwest::Error),
    /// JSON parsing errors
    Json(serde_json::Error),
    /// URL building errors
    Url(url::ParseError),
    /// I/O errors
    Io(std::io::Error),
    /// Generic errors with message
    Generic(String),
}

impl SentryEventsError {
    pub fn api(status: reqwest::StatusCode, url: &str, body: &str) -> Self {
        let mut excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        if excerpt.len() < body.len() {
            excerpt.push_str("...");
        }
        SentryEventsError::Api {
            status: status.as_u16(),
            url: url.to_string(),
            body: excerpt,
        }
    }

    /// True for failures detected before any network activity
    pub fn is_precondition(&self) -> bool {
        matches!(self, SentryEventsError::Config(_) | SentryEventsError::Validation(_))
    }
}

impl fmt::Display for SentryEventsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentryEventsError::Config(msg) => write!(f, "{}", msg),
            SentryEventsError::Validation(msg) => write!(f, "{}", msg),
            SentryEventsError::Api { status, url, body } => {
                if body.is_empty() {
                    write!(f, "Sentry API error: {} returned status {}", url, status)
                } else {
                    write!(f, "Sentry API error: {} returned status {}: {}", url, status, body)
                }
            }
            SentryEventsError::Http(err) => write!(f, "HTTP error: {}", err),
            SentryEventsError::Json(err) => write!(f, "JSON error: {}", err),
            SentryEventsError::Url(err) => write!(f, "URL error: {}", err),
            SentryEventsError::Io(err) => write!(f, "I/O error: {}", err),
            SentryEventsError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SentryEventsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SentryEventsError::Http(err) => Some(err),
            SentryEventsError::Json(err) => Some(err),
            SentryEventsError::Url(err) => Some(err),
            SentryEventsError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SentryEventsError {
    fn from(err: std::io::Error) -> Self {
        SentryEventsError::Io(err)
    }
}

impl From<serde_json::Error> for SentryEventsError {
    fn from(err: serde_json::Error) -> Self {
        SentryEventsError::Json(err)
    }
}

impl From<reqwest::Error> for SentryEventsError {
    fn from(err: reqwest::Error) -> Self {
        SentryEventsError::Http(err)
    }
}

impl From<url::ParseError> for SentryEventsError {
    fn from(err: url::ParseError) -> Self {
        SentryEventsError::Url(err)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for SentryEventsError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        SentryEventsError::Config(format!("invalid header value: {}", err))
    }
}

impl From<tokio::sync::AcquireError> for SentryEventsError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        SentryEventsError::Generic(err.to_string())
    }
}

impl From<tokio::task::JoinError> for SentryEventsError {
    fn from(err: tokio::task::JoinError) -> Self {
        SentryEventsError::Generic(format!("extended event task failed: {}", err))
    }
}

impl From<String> for SentryEventsError {
    fn from(err: String) -> Self {
        SentryEventsError::Generic(err)
    }
}

impl From<anyhow::Error> for SentryEventsError {
    fn from(err: anyhow::Error) -> Self {
        SentryEventsError::Generic(err.to_string())
    }
}

/// Result type alias for get-sentry-event-data operations
pub type Result<T> = std::result::Result<T, SentryEventsError>;
