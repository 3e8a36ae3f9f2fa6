//! Authenticated request pipeline
//!
//! Builds the URL, attaches the bearer token, serializes the body, performs
//! the call and classifies the outcome. Every stage reports to the debug log.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use noteapp_domain::DebugPhase;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use url::Url;

use super::errors::ApiError;
use super::messages::{
    normalize_route_key, resolve_error_message, DECODE_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE,
};
use crate::debug::{details, mask_token, DebugLog};
use crate::http::HttpClient;
use crate::session::TokenStore;

const APPLICATION_JSON: &str = "application/json";

/// Request payload
#[derive(Debug)]
pub enum RequestBody {
    /// Sent with `Content-Type: application/json`
    Json(Value),
    /// Sent as-is; reqwest sets the boundary header
    Multipart(Form),
    /// Sent as-is
    Bytes(Vec<u8>),
}

/// Per-call options for [`ApiClient::request`]
#[derive(Debug)]
pub struct RequestConfig {
    method: Method,
    headers: HeaderMap,
    body: Option<RequestBody>,
    query: Vec<(String, Option<String>)>,
    auth: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { method: Method::GET, headers: HeaderMap::new(), body: None, query: Vec::new(), auth: true }
    }
}

impl RequestConfig {
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serialize `body` as the JSON payload
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if `body` cannot be represented as
    /// JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {e}")))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    #[must_use]
    pub fn bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Some(RequestBody::Bytes(bytes.into()));
        self
    }

    /// Add a query parameter; `None` values are skipped
    #[must_use]
    pub fn query<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.query.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// Whether to attach the stored token (default `true`)
    #[must_use]
    pub fn auth(mut self, auth: bool) -> Self {
        self.auth = auth;
        self
    }
}

/// Client for the notes API
///
/// Cheap to clone; clones share the transport, token store and debug log.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: Url,
    tokens: Arc<TokenStore>,
    debug_log: Arc<DebugLog>,
}

impl ApiClient {
    pub fn new(
        http: HttpClient,
        base_url: Url,
        tokens: Arc<TokenStore>,
        debug_log: Arc<DebugLog>,
    ) -> Self {
        Self { http, base_url, tokens, debug_log }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn debug_log(&self) -> &Arc<DebugLog> {
        &self.debug_log
    }

    /// Perform a request and decode the JSON response into `T`
    ///
    /// A 204 response decodes `T` from `null`, so `()` and `Option<_>` are
    /// the natural targets for endpoints without a body.
    ///
    /// # Errors
    /// - `ApiError::Network` when no response was received
    /// - `ApiError::Http` for non-2xx responses, with the resolved message
    /// - `ApiError::Decode` when a successful payload does not fit `T`
    /// - `ApiError::InvalidUrl` / `ApiError::InvalidRequest` when the request
    ///   cannot be built
    #[instrument(skip(self, config), fields(method = %config.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        let RequestConfig { method, mut headers, body, query, auth } = config;

        let url = self.build_url(path, &query)?;
        let route_key = normalize_route_key(method.as_str(), path);

        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        let token = if auth { self.tokens.token() } else { None };
        if let Some(token) = token.as_deref() {
            headers.insert(AUTHORIZATION, authorization_value(token)?);
        }

        let mut builder = self.http.request(method.clone(), url.clone());
        match body {
            Some(RequestBody::Json(value)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
                let bytes = serde_json::to_vec(&value).map_err(|e| {
                    ApiError::InvalidRequest(format!("Failed to serialize body: {e}"))
                })?;
                builder = builder.body(bytes);
            }
            Some(RequestBody::Multipart(form)) => builder = builder.multipart(form),
            Some(RequestBody::Bytes(bytes)) => builder = builder.body(bytes),
            None => {}
        }
        let builder = builder.headers(headers);

        let label = format!("{method} {}", url.path());
        let token_preview = mask_token(token.as_deref());

        self.debug_log.add_entry(
            DebugPhase::Request,
            label.as_str(),
            details(json!({
                "url": url.as_str(),
                "method": method.as_str(),
                "authRequired": auth,
                "authAttached": token.is_some(),
                "tokenPreview": token_preview,
            })),
        );
        debug!(url = %url, route = %route_key, auth_attached = token.is_some(), "API request");

        let response = match self.http.send(builder).await {
            Ok(response) => response,
            Err(err) => return Err(self.network_failure(&label, &url, &method, err)),
        };

        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            self.log_response(&label, &url, &method, status, &token_preview);
            return serde_json::from_value(Value::Null)
                .map_err(|e| decode_error(status, Value::Null, &e));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => return Err(self.network_failure(&label, &url, &method, err)),
        };
        let payload = parse_payload(&text);

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED && auth {
                self.handle_unauthorized();
            }

            let message = resolve_error_message(&route_key, status.as_u16(), &payload);
            self.debug_log.add_entry(
                DebugPhase::Error,
                label.as_str(),
                details(json!({
                    "url": url.as_str(),
                    "method": method.as_str(),
                    "status": status.as_u16(),
                    "message": message,
                })),
            );
            warn!(url = %url, status = status.as_u16(), message = %message, "API request failed");
            return Err(ApiError::http(message, status.as_u16(), payload));
        }

        self.log_response(&label, &url, &method, status, &token_preview);

        <T as serde::Deserialize>::deserialize(&payload)
            .map_err(|e| decode_error(status, payload.clone(), &e))
    }

    /// Join `path` onto the base URL and apply `query`
    ///
    /// Absolute `http(s)` paths are used verbatim. A later value for the same
    /// key replaces an earlier one, including keys already in `path`.
    fn build_url(&self, path: &str, query: &[(String, Option<String>)]) -> Result<Url, ApiError> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)
        } else if path.starts_with('/') {
            self.base_url.join(path)
        } else {
            self.base_url.join(&format!("/{path}"))
        }
        .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;

        let mut params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let mut changed = false;

        for (key, value) in query {
            let Some(value) = value else { continue };
            changed = true;
            match params.iter().position(|(existing, _)| existing == key) {
                Some(first) => {
                    params[first].1.clone_from(value);
                    let mut index = 0;
                    params.retain(|(existing, _)| {
                        let keep = existing != key || index == first;
                        index += 1;
                        keep
                    });
                }
                None => params.push((key.clone(), value.clone())),
            }
        }

        if changed {
            url.query_pairs_mut().clear().extend_pairs(params);
        }

        Ok(url)
    }

    /// Clear the token on a 401 only when it is missing or already expired
    ///
    /// A token that still looks valid locally is kept even though the server
    /// rejected it.
    fn handle_unauthorized(&self) {
        let now = Utc::now().timestamp_millis();
        let should_clear = self.tokens.token().is_none()
            || self.tokens.token_expiry().is_some_and(|expires_at| expires_at <= now);

        if should_clear {
            if let Err(err) = self.tokens.clear_token() {
                warn!(error = %err, "Failed to clear rejected token");
            }
        } else {
            debug!("Keeping locally unexpired token after 401");
        }
    }

    fn network_failure(
        &self,
        label: &str,
        url: &Url,
        method: &Method,
        err: reqwest::Error,
    ) -> ApiError {
        self.debug_log.add_entry(
            DebugPhase::Error,
            label,
            details(json!({
                "url": url.as_str(),
                "method": method.as_str(),
                "status": 0,
                "message": NETWORK_ERROR_MESSAGE,
                "error": err.to_string(),
            })),
        );
        warn!(url = %url, error = %err, "API request did not reach the server");
        ApiError::Network { message: NETWORK_ERROR_MESSAGE.to_string(), source: err }
    }

    fn log_response(
        &self,
        label: &str,
        url: &Url,
        method: &Method,
        status: StatusCode,
        token_preview: &str,
    ) {
        self.debug_log.add_entry(
            DebugPhase::Response,
            label,
            details(json!({
                "url": url.as_str(),
                "method": method.as_str(),
                "status": status.as_u16(),
                "tokenPreview": token_preview,
            })),
        );
        debug!(url = %url, status = status.as_u16(), "API response");
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url.as_str()).finish_non_exhaustive()
    }
}

/// `Bearer <token>`, unless the token already carries the scheme
fn authorization_value(token: &str) -> Result<HeaderValue, ApiError> {
    let has_scheme = token.get(..7).is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "));
    let value = if has_scheme { token.to_string() } else { format!("Bearer {token}") };

    let mut header = HeaderValue::from_str(&value)
        .map_err(|_| ApiError::InvalidRequest("Stored token is not a valid header value".into()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Empty body is `null`; non-JSON text becomes a JSON string
fn parse_payload(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn decode_error(status: StatusCode, payload: Value, err: &serde_json::Error) -> ApiError {
    warn!(status = status.as_u16(), error = %err, "Response did not match the expected shape");
    ApiError::Decode {
        message: DECODE_ERROR_MESSAGE.to_string(),
        status: status.as_u16(),
        details: Some(json!({ "error": err.to_string(), "payload": payload })),
    }
}
