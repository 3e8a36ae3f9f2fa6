//! Secret masking
//!
//! Bearer tokens are shown as a short preview so two values can be told apart
//! without exposing them.

/// Number of leading and trailing characters kept visible.
const VISIBLE_EDGE: usize = 4;

/// Values at or below this length are masked entirely.
const FULL_MASK_MAX_LEN: usize = 8;

const ELLIPSIS: &str = "...";

/// Produce a display-safe preview of a token.
///
/// Surrounding whitespace is ignored. Empty input yields an empty string,
/// values of up to eight characters are replaced by `*` of the same length,
/// and longer values keep their first and last four characters around an
/// ellipsis.
///
/// # Examples
///
/// ```
/// use noteapp_common::privacy::mask_token;
///
/// assert_eq!(mask_token(None), "");
/// assert_eq!(mask_token(Some("abcd1234")), "********");
/// assert_eq!(mask_token(Some("abcdefghijkl")), "abcd...ijkl");
/// ```
#[must_use]
pub fn mask_token(token: Option<&str>) -> String {
    let Some(normalized) = token.map(str::trim).filter(|value| !value.is_empty()) else {
        return String::new();
    };

    let chars: Vec<char> = normalized.chars().collect();
    if chars.len() <= FULL_MASK_MAX_LEN {
        return "*".repeat(chars.len());
    }

    let head: String = chars.iter().take(VISIBLE_EDGE).collect();
    let tail: String = chars.iter().skip(chars.len() - VISIBLE_EDGE).collect();
    format!("{head}{ELLIPSIS}{tail}")
}
