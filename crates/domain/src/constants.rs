//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

// Configuration defaults
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

// Durable storage keys
pub const TOKEN_STORAGE_KEY: &str = "noteapp:token";
pub const TOKEN_EXPIRY_STORAGE_KEY: &str = "noteapp:token-expiry";

// Debug log
pub const MAX_DEBUG_ENTRIES: usize = 200;

// Display
pub const DISPLAY_TIME_ZONE: &str = "Asia/Phnom_Penh";
pub const UNKNOWN_DATE_LABEL: &str = "Unknown";

// HTTP endpoints
pub const AUTH_REGISTER_PATH: &str = "/auth/register";
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const NOTES_PATH: &str = "/notes";
pub const HEALTH_DB_PATH: &str = "/health/db";
