//! Authentication and session identity
//!
//! Register/login exchange credentials for a token, persist it, and derive
//! the session from its claims. Reading the session has a side effect: an
//! undecodable, incomplete or expired token is cleared.

use chrono::Utc;
use noteapp_domain::constants::{AUTH_LOGIN_PATH, AUTH_REGISTER_PATH};
use noteapp_domain::{AuthResponse, LoginRequest, RegisterRequest, SessionUser};
use tracing::{debug, info, instrument, warn};

use super::client::{ApiClient, RequestConfig};
use super::errors::ApiError;
use crate::session::claims::{email_text, parse_user_id};
use crate::session::TokenClaims;

/// Auth endpoints and session derivation
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Identity carried by the stored token
    ///
    /// Returns `None`, clearing the token, when it cannot be decoded, lacks
    /// an id or email, has expired, or carries a non-integral id. The stored
    /// expiry takes precedence over the `exp` claim.
    pub fn session_user(&self) -> Option<SessionUser> {
        let token = self.client.tokens().token()?;

        let Some(claims) = TokenClaims::decode(&token) else {
            warn!("Stored token could not be decoded");
            self.discard_session();
            return None;
        };

        let (Some(raw_id), Some(raw_email)) = (claims.user_id(), claims.email()) else {
            warn!("Stored token is missing identity claims");
            self.discard_session();
            return None;
        };

        let expires_at = self.client.tokens().token_expiry().or_else(|| claims.expires_at_millis());
        if expires_at.is_some_and(|at| at <= Utc::now().timestamp_millis()) {
            info!("Session expired");
            self.discard_session();
            return None;
        }

        let Some(id) = parse_user_id(raw_id) else {
            warn!("Invalid user identifier in token payload");
            self.discard_session();
            return None;
        };

        Some(SessionUser { id, email: email_text(raw_email), token, expires_at })
    }

    /// Create an account and sign in
    ///
    /// # Errors
    /// Request failures as [`ApiClient::request`]; `ApiError::Storage` if the
    /// token cannot be persisted; `ApiError::SessionEstablishment` if the
    /// issued token yields no session.
    #[instrument(skip(self, payload))]
    pub async fn register(&self, payload: &RegisterRequest) -> Result<SessionUser, ApiError> {
        let config = RequestConfig::post().auth(false).json(payload)?;
        let response: AuthResponse = self.client.request(AUTH_REGISTER_PATH, config).await?;
        self.establish_session(&response)
    }

    /// Sign in with email and password
    ///
    /// # Errors
    /// As [`AuthApi::register`].
    #[instrument(skip(self, payload))]
    pub async fn login(&self, payload: &LoginRequest) -> Result<SessionUser, ApiError> {
        let config = RequestConfig::post().auth(false).json(payload)?;
        let response: AuthResponse = self.client.request(AUTH_LOGIN_PATH, config).await?;
        self.establish_session(&response)
    }

    /// Forget the stored token
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if durable storage could not be updated;
    /// the in-memory session is cleared regardless.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ApiError> {
        info!("Signing out");
        self.client.tokens().clear_token()?;
        Ok(())
    }

    fn establish_session(&self, response: &AuthResponse) -> Result<SessionUser, ApiError> {
        self.client.tokens().set_token(&response.token, response.expires_in_seconds)?;

        let user = self.session_user().ok_or_else(|| {
            warn!("Issued token did not yield a session");
            ApiError::SessionEstablishment
        })?;

        info!(user_id = user.id, expires_at = ?user.expires_at, "Session established");
        Ok(user)
    }

    fn discard_session(&self) {
        debug!("Discarding stored session");
        if let Err(err) = self.client.tokens().clear_token() {
            warn!(error = %err, "Failed to clear stored token");
        }
    }
}
