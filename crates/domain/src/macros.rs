//! Macro for implementing Display and FromStr for wire enums
//!
//! This macro eliminates boilerplate for enums that travel as fixed strings
//! (query parameters, debug phases, environment names). It provides a single
//! implementation for both Display and FromStr traits with case-insensitive
//! parsing.
//!
//! # Example
//!
//! ```rust
//! use noteapp_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum SortField {
//!     CreatedAt,
//!     Title,
//! }
//!
//! impl_domain_status_conversions!(SortField {
//!     CreatedAt => "createdAt",
//!     Title => "title",
//! });
//!
//! assert_eq!(SortField::CreatedAt.to_string(), "createdAt");
//! assert_eq!("CREATEDAT".parse::<SortField>(), Ok(SortField::CreatedAt));
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// This macro generates:
/// - Display trait: writes the exact string given for each variant
/// - FromStr trait: parses strings to variants, ignoring ASCII case
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Returns the canonical string form of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestField {
        CreatedAt,
        UpdatedAt,
        Title,
    }

    impl_domain_status_conversions!(TestField {
        CreatedAt => "createdAt",
        UpdatedAt => "updatedAt",
        Title => "title",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestField::CreatedAt.to_string(), "createdAt");
        assert_eq!(TestField::UpdatedAt.to_string(), "updatedAt");
        assert_eq!(TestField::Title.to_string(), "title");
    }

    #[test]
    fn test_fromstr_exact() {
        assert_eq!(TestField::from_str("createdAt").unwrap(), TestField::CreatedAt);
        assert_eq!(TestField::from_str("title").unwrap(), TestField::Title);
    }

    #[test]
    fn test_fromstr_mixed_case() {
        assert_eq!(TestField::from_str("UPDATEDAT").unwrap(), TestField::UpdatedAt);
        assert_eq!(TestField::from_str("Title").unwrap(), TestField::Title);
    }

    #[test]
    fn test_fromstr_invalid() {
        let err = TestField::from_str("author").unwrap_err();
        assert_eq!(err, "Invalid TestField: author");
    }
}
