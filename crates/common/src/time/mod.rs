//! Time utilities
//!
//! - **[`format`]**: Display formatting for server timestamps
//!
//! ## Usage
//!
//! ```rust
//! use noteapp_common::time::format_cambodia_datetime;
//!
//! assert_eq!(format_cambodia_datetime(Some("2025-01-05T08:04:00Z")), "Jan 5, 2025, 03:04 PM");
//! assert_eq!(format_cambodia_datetime(None), "Unknown");
//! ```

pub mod format;

pub use format::{format_cambodia_datetime, parse_server_timestamp};
