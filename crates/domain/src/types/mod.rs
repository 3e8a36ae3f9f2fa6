//! Domain types and models
//!
//! Wire shapes for the notes, auth and health endpoints, plus the derived
//! session identity and debug-log records.

pub mod auth;
pub mod debug;
pub mod health;
pub mod notes;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest, SessionUser};
pub use debug::{DebugDetails, DebugEntry, DebugPhase};
pub use health::HealthStatus;
pub use notes::{ListNotesOptions, Note, NoteCreate, NoteSort, NoteUpdate};
