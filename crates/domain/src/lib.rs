//! # NoteApp Domain
//!
//! Domain types and models for the NoteApp client.
//!
//! This crate contains:
//! - Wire types for the notes, auth and health endpoints
//! - Session identity and debug-event records
//! - Client configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other NoteApp crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
