//! Token claim decoding
//!
//! The token is decoded, never verified. The middle segment is read as
//! base64url JSON (padding optional) and identity claims are looked up
//! through ordered candidate key lists.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};

const BASE64_URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const NAME_IDENTIFIER_URI: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
const EMAIL_ADDRESS_URI: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";

/// Candidate keys for the user id, most specific first
pub const USER_ID_CLAIMS: [&str; 3] = ["sub", "nameidentifier", NAME_IDENTIFIER_URI];

/// Candidate keys for the email address
pub const EMAIL_CLAIMS: [&str; 2] = ["email", EMAIL_ADDRESS_URI];

/// Decoded claim set of a token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    /// Decode the payload segment of `token`
    ///
    /// Returns `None` when the token has no payload segment or the segment is
    /// not base64url-encoded JSON object.
    pub fn decode(token: &str) -> Option<Self> {
        let segment = token.split('.').nth(1).filter(|s| !s.is_empty())?;
        let bytes = BASE64_URL_LENIENT.decode(segment.trim_end_matches('=')).ok()?;
        match serde_json::from_slice::<Value>(&bytes).ok()? {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// First non-null value among `keys`
    ///
    /// A falsy value (`""`, `0`, `false`) still wins the lookup; callers
    /// decide whether it is usable.
    pub fn resolve(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().filter_map(|key| self.0.get(*key)).find(|value| !value.is_null())
    }

    /// The `exp` claim in milliseconds, when it is numeric
    #[allow(clippy::cast_possible_truncation)]
    pub fn expires_at_millis(&self) -> Option<i64> {
        self.0
            .get("exp")
            .and_then(Value::as_f64)
            .filter(|exp| exp.is_finite())
            .map(|exp| (exp * 1000.0) as i64)
    }

    /// Resolved user id claim, or `None` when missing or falsy
    pub fn user_id(&self) -> Option<&Value> {
        self.resolve(&USER_ID_CLAIMS).filter(|value| !is_falsy(value))
    }

    /// Resolved email claim, or `None` when missing or falsy
    pub fn email(&self) -> Option<&Value> {
        self.resolve(&EMAIL_CLAIMS).filter(|value| !is_falsy(value))
    }
}

/// `null`, `false`, `0` and `""` carry no identity
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n == 0.0 || n.is_nan()),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Parse a user id claim into an integral id
///
/// Numbers and numeric strings are accepted when finite and integral.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn parse_user_id(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(number) => {
            if let Some(id) = number.as_i64() {
                return Some(id);
            }
            number.as_f64()?
        }
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(id) = trimmed.parse::<i64>() {
                return Some(id);
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    let in_range = number >= i64::MIN as f64 && number <= i64::MAX as f64;
    (number.is_finite() && number.fract() == 0.0 && in_range).then(|| number as i64)
}

/// Render an email claim as text
pub fn email_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::test_tokens::token_with;
    use super::*;

    #[test]
    fn decodes_unpadded_and_padded_segments() {
        let token = token_with(&json!({ "sub": "42", "email": "a@b.c" }));
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.user_id(), Some(&json!("42")));

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        while parts[1].len() % 4 != 0 {
            parts[1].push('=');
        }
        assert!(TokenClaims::decode(&parts.join(".")).is_some());
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert!(TokenClaims::decode("no-dots").is_none());
        assert!(TokenClaims::decode("a..c").is_none());
        assert!(TokenClaims::decode("a.!!!.c").is_none());

        let not_object = format!("h.{}.s", base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("[1]"));
        assert!(TokenClaims::decode(&not_object).is_none());
    }

    #[test]
    fn id_lookup_follows_candidate_order() {
        let token = token_with(&json!({
            "nameidentifier": "7",
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier": "8",
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress": "x@y.z"
        }));
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.user_id(), Some(&json!("7")));
        assert_eq!(claims.email(), Some(&json!("x@y.z")));
    }

    #[test]
    fn null_falls_through_but_falsy_does_not() {
        let claims =
            TokenClaims::decode(&token_with(&json!({ "sub": null, "nameidentifier": 5 }))).unwrap();
        assert_eq!(claims.user_id(), Some(&json!(5)));

        let claims =
            TokenClaims::decode(&token_with(&json!({ "sub": "", "nameidentifier": 5 }))).unwrap();
        assert_eq!(claims.user_id(), None);
    }

    #[test]
    fn exp_is_converted_to_millis() {
        let claims = TokenClaims::decode(&token_with(&json!({ "exp": 1_700_000_000 }))).unwrap();
        assert_eq!(claims.expires_at_millis(), Some(1_700_000_000_000));

        let claims = TokenClaims::decode(&token_with(&json!({ "exp": "soon" }))).unwrap();
        assert_eq!(claims.expires_at_millis(), None);
    }

    #[test]
    fn user_id_must_be_integral() {
        assert_eq!(parse_user_id(&json!(12)), Some(12));
        assert_eq!(parse_user_id(&json!(" 12 ")), Some(12));
        assert_eq!(parse_user_id(&json!("12.0")), Some(12));
        assert_eq!(parse_user_id(&json!(12.5)), None);
        assert_eq!(parse_user_id(&json!("abc")), None);
        assert_eq!(parse_user_id(&json!("inf")), None);
        assert_eq!(parse_user_id(&json!(true)), None);
    }

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(is_falsy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(1), json!("0"), json!([]), json!({})] {
            assert!(!is_falsy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn email_text_stringifies_non_strings() {
        assert_eq!(email_text(&json!("a@b.c")), "a@b.c");
        assert_eq!(email_text(&json!(42)), "42");
    }
}
