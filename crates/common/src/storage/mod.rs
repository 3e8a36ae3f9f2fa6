//! Key-value storage for session state
//!
//! String values under string keys, with change notifications in the shape
//! of a browser `storage` event: a write made through one handle is
//! announced to every *other* handle observing the same data.
//!
//! - [`SharedMemoryStorage`]: process-local, with per-context handles
//! - [`FileStorage`]: JSON file on disk, re-read with [`FileStorage::rescan`]

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::SharedMemoryStorage;
pub use traits::{KeyValueStore, StorageEvent, StorageListener};
