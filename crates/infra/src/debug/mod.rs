//! In-app debug event feed
//!
//! Separate from `tracing`: entries are meant for an on-screen console and
//! are kept in memory only.

pub mod log;

pub use log::{details, DebugLog};
pub use noteapp_common::mask_token;
