//! # NoteApp Infrastructure
//!
//! Client-side implementation of the NoteApp session and API.
//!
//! This crate contains:
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - The HTTP transport and the authenticated request pipeline
//! - Token persistence and session derivation
//! - The in-app debug log
//! - Typed wrappers for the auth, notes and health endpoints
//!
//! ## Architecture
//! - Domain types come from `noteapp-domain`
//! - Storage, listener registries and collections come from `noteapp-common`
//! - [`ClientContext`] wires everything together; there is no global state

pub mod api;
pub mod config;
pub mod context;
pub mod debug;
pub mod http;
pub mod session;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, ApiErrorCategory, AuthApi, HealthApi, NotesApi, RequestConfig};
pub use context::ClientContext;
pub use debug::DebugLog;
pub use http::HttpClient;
pub use session::TokenStore;
