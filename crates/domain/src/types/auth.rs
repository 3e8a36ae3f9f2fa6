//! Authentication types
//!
//! Credentials sent to `/auth/*`, the token response, and the session
//! identity derived from the stored token.

use serde::{Deserialize, Serialize};

/// Payload for `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

/// Payload for `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

/// Token issued by register/login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    /// Declared token lifetime in seconds, when the server provides one.
    #[serde(default)]
    pub expires_in_seconds: Option<f64>,
}

/// Identity derived from the current token
///
/// Recomputed on every read and never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub token: String,
    /// Absolute expiry in milliseconds since the Unix epoch.
    pub expires_at: Option<i64>,
}
