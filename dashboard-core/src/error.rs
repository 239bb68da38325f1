//! Fetch failures and their user-facing classification.
//!
//! Only the fetch step can fail. Failures are classified once, at the
//! repository boundary, into a fixed set of messages; nothing is retried.

use std::error::Error as StdError;

use thiserror::Error;

/// A failed round trip to the weather-data source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("DNS resolution failed: {0}")]
    Dns(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            let detail = error_chain(&err);
            if is_dns_failure(&detail) {
                FetchError::Dns(detail)
            } else {
                FetchError::Connect(detail)
            }
        } else if let Some(status) = err.status() {
            FetchError::Status { status: status.as_u16(), body: String::new() }
        } else if err.is_decode() {
            FetchError::Decode(error_chain(&err))
        } else {
            FetchError::Other(error_chain(&err))
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn is_dns_failure(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkCause {
    /// An HTTP status outside the specifically handled ones.
    UnexpectedStatus,
    NoInternet,
    ConnectionFailed,
    Timeout,
}

/// What the user is told when a fetch fails. `Display` is the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCategory {
    #[error("Invalid API key. Please check your configuration.")]
    Auth,

    #[error("Location not found. Please check the city name.")]
    NotFound,

    #[error("API limit reached. Please try again later.")]
    RateLimit,

    #[error("Server error. Please try again later.")]
    Server,

    #[error("{}", network_message(.0))]
    Network(NetworkCause),

    #[error("Something went wrong. Please try again.")]
    Unknown,
}

fn network_message(cause: &NetworkCause) -> &'static str {
    match cause {
        NetworkCause::UnexpectedStatus => "Network error. Please try again.",
        NetworkCause::NoInternet => "No internet connection. Please check your network.",
        NetworkCause::ConnectionFailed => {
            "Connection failed. Please check your internet connection."
        }
        NetworkCause::Timeout => "Request timeout. Please try again.",
    }
}

pub fn classify(failure: &FetchError) -> ErrorCategory {
    match failure {
        FetchError::Status { status, .. } => match status {
            401 => ErrorCategory::Auth,
            404 => ErrorCategory::NotFound,
            429 => ErrorCategory::RateLimit,
            500..=599 => ErrorCategory::Server,
            _ => ErrorCategory::Network(NetworkCause::UnexpectedStatus),
        },
        FetchError::Dns(_) => ErrorCategory::Network(NetworkCause::NoInternet),
        FetchError::Connect(_) => ErrorCategory::Network(NetworkCause::ConnectionFailed),
        FetchError::Timeout => ErrorCategory::Network(NetworkCause::Timeout),
        FetchError::Cancelled | FetchError::Decode(_) | FetchError::Other(_) => {
            ErrorCategory::Unknown
        }
    }
}

pub fn user_message(failure: &FetchError) -> String {
    classify(failure).to_string()
}
