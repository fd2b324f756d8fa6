//! KvStore - the atomic primitives the versioning components rely on.

use super::KvError;

/// Abstract key-value storage shared by all request handlers.
///
/// Every method is a single round trip and may block on I/O. Implementations
/// must make each primitive atomic with respect to concurrent callers; that is
/// the only coordination the versioning layer uses.
pub trait KvStore: Send + Sync {
    /// Atomically increment an integer counter and return the new value.
    /// A missing key counts as 0, so the first call returns 1.
    fn incr(&self, key: &str) -> Result<u64, KvError>;

    /// Write `bytes` only if `key` is unoccupied.
    /// Returns `Ok(false)` and leaves the existing value untouched otherwise.
    fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<bool, KvError>;

    /// Read the bytes stored at `key`. Returns None if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Overwrite `key` unconditionally.
    fn set(&self, key: &str, bytes: Vec<u8>) -> Result<(), KvError>;

    /// Replace the value at `key` with `new` only if it currently equals
    /// `expected` (`None` meaning absent). Returns whether the swap happened.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, KvError>;

    /// Push `item` onto the right end of the list at `key`, creating it if
    /// needed. Returns the new list length.
    fn append(&self, key: &str, item: &str) -> Result<u64, KvError>;

    /// Push `item` onto the list at `key` only if the list does not already
    /// hold it. Check and push are one atomic step. Returns whether it was added.
    fn append_if_absent(&self, key: &str, item: &str) -> Result<bool, KvError>;

    /// Read the whole list at `key` in insertion order. Empty if absent.
    fn list(&self, key: &str) -> Result<Vec<String>, KvError>;
}
