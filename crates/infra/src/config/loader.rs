//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file from the working directory when present
//! 2. Uses environment variables when any `NOTEAPP_*` variable is set
//! 3. Otherwise probes for a config file
//! 4. Falls back to built-in defaults
//!
//! ## Environment Variables
//! - `NOTEAPP_API_URL`: Base URL of the notes API (default
//!   `http://localhost:3333`)
//! - `NOTEAPP_ENV`: `development`, `test` or `production` (default)
//! - `NOTEAPP_DEBUG_CONSOLE`: Opt-in flag for the in-app debug log
//! - `NOTEAPP_STORAGE_PATH`: JSON file for the durable token store
//! - `NOTEAPP_REQUEST_TIMEOUT_SECS`: Transport timeout in seconds
//!
//! ## File Locations
//! The loader probes `./noteapp.{toml,json}` then `./config.{toml,json}` in
//! the working directory and next to the executable.

use std::path::{Path, PathBuf};

use noteapp_domain::constants::DEFAULT_API_URL;
use noteapp_domain::{ClientConfig, Environment, NoteAppError, Result};
use url::Url;

pub const ENV_API_URL: &str = "NOTEAPP_API_URL";
pub const ENV_ENVIRONMENT: &str = "NOTEAPP_ENV";
pub const ENV_DEBUG_CONSOLE: &str = "NOTEAPP_DEBUG_CONSOLE";
pub const ENV_STORAGE_PATH: &str = "NOTEAPP_STORAGE_PATH";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "NOTEAPP_REQUEST_TIMEOUT_SECS";

const ALL_ENV_VARS: [&str; 5] =
    [ENV_API_URL, ENV_ENVIRONMENT, ENV_DEBUG_CONSOLE, ENV_STORAGE_PATH, ENV_REQUEST_TIMEOUT_SECS];

const CONFIG_FILE_NAMES: [&str; 4] = ["noteapp.toml", "noteapp.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `NoteAppError::Config` if the chosen source holds invalid values
/// or a probed file cannot be parsed.
pub fn load() -> Result<ClientConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    if ALL_ENV_VARS.iter().any(|key| std::env::var_os(key).is_some()) {
        let config = load_from_env()?;
        tracing::info!(base_url = %config.base_url, "Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No configuration source found, using defaults");
            load_from_env()
        }
    }
}

/// Load configuration from environment variables
///
/// Unset variables take their defaults.
///
/// # Errors
/// Returns `NoteAppError::Config` if a variable holds an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let base_url = env_opt(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let environment = match env_opt(ENV_ENVIRONMENT) {
        Some(raw) => raw.parse::<Environment>().map_err(|e| {
            NoteAppError::Config(format!("Invalid {ENV_ENVIRONMENT}: {e}"))
        })?,
        None => Environment::default(),
    };

    let request_timeout_secs = env_opt(ENV_REQUEST_TIMEOUT_SECS)
        .map(|raw| {
            raw.parse::<u64>().map_err(|e| {
                NoteAppError::Config(format!("Invalid {ENV_REQUEST_TIMEOUT_SECS}: {e}"))
            })
        })
        .transpose()?;

    let config = ClientConfig {
        base_url,
        environment,
        debug_console: env_opt(ENV_DEBUG_CONSOLE),
        storage_path: env_opt(ENV_STORAGE_PATH).map(PathBuf::from),
        request_timeout_secs,
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports JSON and TOML
/// (detected by file extension); missing keys take their defaults.
///
/// # Errors
/// Returns `NoteAppError::Config` if the file is missing, unreadable, in an
/// unsupported format, or holds invalid values.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(NoteAppError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            NoteAppError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| NoteAppError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| NoteAppError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| NoteAppError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(NoteAppError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// The base URL must be an absolute `http(s)` URL
fn validate(config: &ClientConfig) -> Result<()> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        NoteAppError::Config(format!("Invalid API URL '{}': {e}", config.base_url))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(NoteAppError::Config(format!(
            "API URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
