//! Modular common utilities shared across NoteApp crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: collections, privacy helpers, display-time formatting
//! - `platform`: listener registries and durable key-value storage
//! - `observability`: tracing output (pulled in by `platform`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod collections;
#[cfg(feature = "foundation")]
pub mod privacy;
#[cfg(feature = "foundation")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod events;
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use collections::RingBuffer;
#[cfg(feature = "platform")]
pub use events::{ListenerSet, Subscription};
#[cfg(feature = "foundation")]
pub use privacy::mask_token;
#[cfg(feature = "platform")]
pub use storage::{
    FileStorage, KeyValueStore, SharedMemoryStorage, StorageError, StorageEvent, StorageResult,
};
#[cfg(feature = "foundation")]
pub use time::format::format_cambodia_datetime;
