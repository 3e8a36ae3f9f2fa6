//! Privacy Module - Portable Core
//!
//! Redaction helpers for values that must never reach logs or debug views in
//! full.

pub mod mask;

// Re-export commonly used functions
pub use mask::mask_token;
