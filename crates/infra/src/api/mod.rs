//! Notes API client
//!
//! [`ApiClient`] is the request pipeline; the resource wrappers borrow it:
//!
//! - [`AuthApi`]: register, login, logout and the derived session
//! - [`NotesApi`]: CRUD over notes
//! - [`HealthApi`]: database health check

pub mod auth;
pub mod client;
pub mod errors;
pub mod health;
pub mod messages;
pub mod notes;

pub use auth::AuthApi;
pub use client::{ApiClient, RequestBody, RequestConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use health::HealthApi;
pub use messages::normalize_route_key;
pub use notes::NotesApi;
