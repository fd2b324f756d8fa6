//! Shared key-value handle used by every versioning component.
//!
//! The components never talk to a global connection. Each one is handed a
//! cloneable [`KvStore`] at construction, so production code can plug in a
//! networked store while tests use [`InMemoryKvStore`].
//!
//! ## Example
//!
//! ```ignore
//! use versioned_models::{InMemoryKvStore, KvStore};
//!
//! let store = InMemoryKvStore::new();
//! assert_eq!(store.incr("model:temp:version_counter")?, 1);
//! assert!(store.put_if_absent("model:temp:v1", vec![1, 2, 3])?);
//! assert!(!store.put_if_absent("model:temp:v1", vec![9])?);
//! ```

mod in_memory;
mod store;

use thiserror::Error;

/// Error type for key-value primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KvError {
    /// The backing store could not be reached (connection, I/O, timeout).
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
    /// An in-memory lock was poisoned by a panicking writer.
    #[error("key-value lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The key holds a value of a different kind than the primitive expects.
    #[error("key {key} holds a value of the wrong type")]
    WrongType { key: String },
    /// Incrementing the counter at `key` would overflow.
    #[error("counter {key} would overflow")]
    Overflow { key: String },
}

pub use in_memory::InMemoryKvStore;
pub use store::KvStore;
