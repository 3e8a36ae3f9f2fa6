//! Client configuration structures
//!
//! Loading lives in `noteapp-infra::config`; this module only describes the
//! shape and the derived decisions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_API_URL;
use crate::impl_domain_status_conversions;

/// Deployment mode the client runs in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

impl_domain_status_conversions!(Environment {
    Development => "development",
    Test => "test",
    Production => "production",
});

/// Configuration for the NoteApp client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every relative request path is resolved against
    pub base_url: String,
    pub environment: Environment,
    /// Opt-in flag for the debug log outside development (`"true"` or `"1"`)
    pub debug_console: Option<String>,
    /// Location of the durable token store; in-memory when unset
    pub storage_path: Option<PathBuf>,
    /// Transport timeout; the transport default applies when unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            environment: Environment::default(),
            debug_console: None,
            storage_path: None,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at `base_url` with all other defaults
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Whether the debug log should record events
    ///
    /// Enabled in development, or when `debug_console` equals `true` or `1`
    /// (case-insensitive).
    #[must_use]
    pub fn debug_enabled(&self) -> bool {
        if self.environment == Environment::Development {
            return true;
        }

        self.debug_console
            .as_deref()
            .map(str::trim)
            .is_some_and(|flag| flag.eq_ignore_ascii_case("true") || flag == "1")
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_api() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3333");
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.debug_enabled());
    }

    #[test]
    fn development_enables_debug_log() {
        let config = ClientConfig { environment: Environment::Development, ..Default::default() };
        assert!(config.debug_enabled());
    }

    #[test]
    fn debug_flag_accepts_true_and_one() {
        for flag in ["true", "TRUE", "1"] {
            let config =
                ClientConfig { debug_console: Some(flag.to_string()), ..Default::default() };
            assert!(config.debug_enabled(), "flag {flag} should enable");
        }

        for flag in ["yes", "0", "false", ""] {
            let config =
                ClientConfig { debug_console: Some(flag.to_string()), ..Default::default() };
            assert!(!config.debug_enabled(), "flag {flag} should not enable");
        }
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("Development".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }
}
