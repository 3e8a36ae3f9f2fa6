//! User-facing error messages
//!
//! Failed responses are mapped to a message in priority order:
//! 1. Route and status override
//! 2. The payload's own `message` or `detail`
//! 3. Per-status fallback
//! 4. Generic fallback

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const DECODE_ERROR_MESSAGE: &str = "The server returned an unexpected response.";

const TITLE_REQUIRED_MESSAGE: &str = "Title is required. Please give your note a title.";
const NOTE_NOT_FOUND_MESSAGE: &str = "This note could not be found. It may have been deleted.";

static NOTE_ID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/notes/[^/]+").expect("NOTE_ID_SEGMENT should compile - this is a bug")
});

struct MessageOverride {
    route: &'static str,
    status: u16,
    applies: fn(&Value) -> bool,
    message: &'static str,
}

const fn always(_: &Value) -> bool {
    true
}

static OVERRIDES: &[MessageOverride] = &[
    MessageOverride {
        route: "POST /auth/login",
        status: 401,
        applies: always,
        message: "Invalid email or password.",
    },
    MessageOverride {
        route: "POST /auth/register",
        status: 409,
        applies: always,
        message: "An account with this email already exists.",
    },
    MessageOverride {
        route: "POST /notes",
        status: 400,
        applies: has_title_error,
        message: TITLE_REQUIRED_MESSAGE,
    },
    MessageOverride {
        route: "PUT /notes/:id",
        status: 400,
        applies: has_title_error,
        message: TITLE_REQUIRED_MESSAGE,
    },
    MessageOverride {
        route: "GET /notes/:id",
        status: 404,
        applies: always,
        message: NOTE_NOT_FOUND_MESSAGE,
    },
    MessageOverride {
        route: "PUT /notes/:id",
        status: 404,
        applies: always,
        message: NOTE_NOT_FOUND_MESSAGE,
    },
    MessageOverride {
        route: "DELETE /notes/:id",
        status: 404,
        applies: always,
        message: NOTE_NOT_FOUND_MESSAGE,
    },
];

/// Normalize `method` and `path` into a route key such as `GET /notes/:id`
///
/// The query string and a leading `/api` segment are dropped, the segment
/// after `/notes/` becomes `:id`, and a trailing slash is removed.
///
/// ```
/// use noteapp_infra::api::messages::normalize_route_key;
///
/// assert_eq!(normalize_route_key("get", "/api/notes/42"), "GET /notes/:id");
/// assert_eq!(normalize_route_key("POST", "notes/?draft=1"), "POST /notes");
/// ```
pub fn normalize_route_key(method: &str, path: &str) -> String {
    let absolute_path;
    let path = if path.starts_with("http://") || path.starts_with("https://") {
        absolute_path = Url::parse(path).map(|url| url.path().to_string()).unwrap_or_default();
        absolute_path.as_str()
    } else {
        path
    };

    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut path = if path.starts_with('/') { path.to_string() } else { format!("/{path}") };

    if path == "/api" {
        path = "/".to_string();
    } else if path.starts_with("/api/") {
        path.replace_range(..4, "");
    }

    let mut path = NOTE_ID_SEGMENT.replace(&path, "/notes/:id").into_owned();

    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    format!("{} {}", method.to_ascii_uppercase(), path)
}

/// Resolve the message shown for a failed response
pub fn resolve_error_message(route_key: &str, status: u16, payload: &Value) -> String {
    if let Some(entry) = OVERRIDES
        .iter()
        .find(|entry| entry.route == route_key && entry.status == status && (entry.applies)(payload))
    {
        return entry.message.to_string();
    }

    if let Some(message) = payload_message(payload) {
        return message;
    }

    status_fallback(status).unwrap_or(GENERIC_ERROR_MESSAGE).to_string()
}

/// `message`, then `detail`, from an object payload; a plain-text payload is
/// its own message
fn payload_message(payload: &Value) -> Option<String> {
    let text = match payload {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => ["message", "detail"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|text| !text.trim().is_empty()),
        _ => None,
    }?;

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

const fn status_fallback(status: u16) -> Option<&'static str> {
    let message = match status {
        400 => "The request was invalid. Please check your input and try again.",
        401 => "Your session has expired. Please sign in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        409 => "This change conflicts with existing data.",
        422 => "Some of the submitted information is invalid.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 => "The server encountered an error. Please try again later.",
        502 => "The server is temporarily unreachable. Please try again later.",
        503 => "The service is temporarily unavailable. Please try again later.",
        504 => "The server took too long to respond. Please try again later.",
        _ => return None,
    };
    Some(message)
}

/// Problem details with a validation error on the `title` field
fn has_title_error(payload: &Value) -> bool {
    payload
        .get("errors")
        .and_then(Value::as_object)
        .is_some_and(|errors| errors.keys().any(|field| field.eq_ignore_ascii_case("title")))
}
