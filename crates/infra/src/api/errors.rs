//! API-specific error types
//!
//! Every failure the request pipeline or the auth flow can surface, with a
//! user-presentable message and the HTTP status (0 when no response was
//! received).

use noteapp_common::StorageError;
use serde_json::Value;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// No response received
    Network,
    /// 401 and 403
    Authentication,
    /// 429
    RateLimit,
    /// Remaining 4xx
    Client,
    /// 5xx
    Server,
    /// Auth succeeded but no usable session could be derived
    Session,
    /// Response did not match the expected shape
    Decode,
    /// Token storage failed
    Storage,
    /// The request could not be built
    Request,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{message}")]
    Http { message: String, status: u16, details: Option<Value> },

    #[error("Unable to establish authenticated session")]
    SessionEstablishment,

    #[error("{message}")]
    Decode { message: String, status: u16, details: Option<Value> },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Message suitable for showing to the user
    pub fn message(&self) -> String {
        match self {
            Self::Network { message, .. }
            | Self::Http { message, .. }
            | Self::Decode { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of the failed response; 0 when none was received
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Http { status, .. } | Self::Decode { status, .. } => *status,
            _ => 0,
        }
    }

    /// Raw response payload, when one was received
    pub const fn details(&self) -> Option<&Value> {
        match self {
            Self::Http { details, .. } | Self::Decode { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Get the error category for this error
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Network { .. } => ApiErrorCategory::Network,
            Self::Http { status, .. } => match *status {
                401 | 403 => ApiErrorCategory::Authentication,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
            Self::SessionEstablishment => ApiErrorCategory::Session,
            Self::Decode { .. } => ApiErrorCategory::Decode,
            Self::Storage(_) => ApiErrorCategory::Storage,
            Self::InvalidUrl(_) | Self::InvalidRequest(_) => ApiErrorCategory::Request,
        }
    }

    /// Structured payloads are kept as details; a plain-text body only
    /// ever serves as the message
    pub(crate) fn http(message: impl Into<String>, status: u16, payload: Value) -> Self {
        Self::Http {
            message: message.into(),
            status,
            details: (!payload.is_null() && !payload.is_string()).then_some(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_http_categories() {
        let category = |status| ApiError::http("x", status, Value::Null).category();
        assert_eq!(category(401), ApiErrorCategory::Authentication);
        assert_eq!(category(403), ApiErrorCategory::Authentication);
        assert_eq!(category(429), ApiErrorCategory::RateLimit);
        assert_eq!(category(404), ApiErrorCategory::Client);
        assert_eq!(category(503), ApiErrorCategory::Server);
    }

    #[test]
    fn test_http_accessors() {
        let err = ApiError::http("Note not found.", 404, json!({ "title": "Not Found" }));
        assert_eq!(err.message(), "Note not found.");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.details(), Some(&json!({ "title": "Not Found" })));
        assert_eq!(err.to_string(), "Note not found.");
    }

    #[test]
    fn test_null_payload_has_no_details() {
        let err = ApiError::http("Request failed", 500, Value::Null);
        assert_eq!(err.details(), None);
    }

    #[test]
    fn test_non_http_errors_have_status_zero() {
        let err = ApiError::SessionEstablishment;
        assert_eq!(err.status_code(), 0);
        assert_eq!(err.message(), "Unable to establish authenticated session");
        assert_eq!(err.category(), ApiErrorCategory::Session);

        let err = ApiError::from(StorageError::Unavailable("read-only".into()));
        assert_eq!(err.category(), ApiErrorCategory::Storage);
        assert_eq!(err.status_code(), 0);
    }
}
