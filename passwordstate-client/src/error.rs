//! Client errors and the helpers mapping HTTP/reqwest failures onto them.

use std::time::Duration;

use thiserror::Error;

use crate::types::api_error_message;

/// Errors from the PasswordState client.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API URL could not be parsed or is not http(s).
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl {
        /// The URL as given.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The API key is empty or cannot be sent as a header value.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    /// PasswordState answered with a non-success status.
    #[error("PasswordState API returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body was not valid password JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Map a non-success status and its body to a [`ClientError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ClientError {
    let message = api_error_message(body).unwrap_or_else(|| body.trim().to_string());
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Map a [`reqwest::Error`] to a [`ClientError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(timeout)
    } else {
        ClientError::Transport(Box::new(err))
    }
}
