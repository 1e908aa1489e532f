//! Error types for the case API client.
//!
//! # Design
//! Variants follow where a call failed. Request-building failures happen
//! before any I/O and never carry a response. Status and decode failures
//! always carry the raw `HttpResponse` so callers can inspect the status code
//! and body; `ApiError::response` gives uniform access to it.

use crate::http::HttpResponse;

/// Errors returned by `Client`, `Transport` implementations and the
/// resource services.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be built, e.g. the base URL is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request never produced a usable response.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        response: Option<HttpResponse>,
    },

    /// The caller's context was cancelled before or during the round trip.
    #[error("context cancelled")]
    Cancelled,

    /// The caller's context deadline passed before or during the round trip.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The server returned 404.
    #[error("resource not found")]
    NotFound { response: HttpResponse },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {}: {}", .response.status, .response.body)]
    Status { response: HttpResponse },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {source}")]
    Deserialization {
        source: serde_json::Error,
        response: HttpResponse,
    },
}

impl ApiError {
    /// The raw response associated with this error, if the server answered.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::Transport { response, .. } => response.as_ref(),
            ApiError::NotFound { response }
            | ApiError::Status { response }
            | ApiError::Deserialization { response, .. } => Some(response),
            ApiError::InvalidRequest(_)
            | ApiError::Serialization(_)
            | ApiError::Cancelled
            | ApiError::DeadlineExceeded => None,
        }
    }

    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            ApiError::Transport { response, .. } => response,
            ApiError::NotFound { response }
            | ApiError::Status { response }
            | ApiError::Deserialization { response, .. } => Some(response),
            _ => None,
        }
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
            response: None,
        }
    }
}
