//! VersionAllocator - issues unique, increasing version numbers per series.

use tracing::debug;

use crate::error::ServingResult;
use crate::keys::ModelKeys;
use crate::kv::{KvError, KvStore};
use crate::version::Version;

/// Hands out the next version of a series from the store's atomic counter.
///
/// Uniqueness and monotonicity come from `KvStore::incr`. Contiguity does
/// not: a save that fails after allocating leaves a permanent hole.
#[derive(Clone)]
pub struct VersionAllocator<S> {
    store: S,
    keys: ModelKeys,
}

impl<S: KvStore> VersionAllocator<S> {
    pub fn new(store: S, keys: ModelKeys) -> Self {
        VersionAllocator { store, keys }
    }

    pub fn allocate(&self, series: &str) -> ServingResult<Version> {
        let key = self.keys.counter(series);
        let number = self.store.incr(&key)?;
        let version = Version::new(number).ok_or_else(|| KvError::WrongType { key })?;
        debug!(series, %version, "allocated version");
        Ok(version)
    }
}
