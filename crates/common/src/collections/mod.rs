//! Specialized data structures
//!
//! - **[`ring_buffer`]**: Fixed-capacity ring buffer that evicts the oldest
//!   element when full
//!
//! ## Usage
//!
//! ```rust
//! use noteapp_common::collections::RingBuffer;
//!
//! let mut buffer = RingBuffer::new(2);
//! buffer.push("a");
//! buffer.push("b");
//! assert_eq!(buffer.push("c"), Some("a"));
//! ```

pub mod ring_buffer;

// Re-export commonly used types
pub use ring_buffer::RingBuffer;
