//! ArtifactStore - write-once blob storage keyed by (series, version).

use crate::error::{ServingError, ServingResult};
use crate::keys::ModelKeys;
use crate::kv::KvStore;
use crate::version::Version;

/// Durable artifact storage. A key, once written, is never overwritten.
#[derive(Clone)]
pub struct ArtifactStore<S> {
    store: S,
    keys: ModelKeys,
}

impl<S: KvStore> ArtifactStore<S> {
    pub fn new(store: S, keys: ModelKeys) -> Self {
        ArtifactStore { store, keys }
    }

    /// Store `bytes` for a fresh key. Fails with `AlreadyExists` if the key
    /// is occupied; the existing bytes stay as they were.
    pub fn put(&self, series: &str, version: Version, bytes: Vec<u8>) -> ServingResult<()> {
        let key = self.keys.artifact(series, version);
        if self.store.put_if_absent(&key, bytes)? {
            Ok(())
        } else {
            Err(ServingError::AlreadyExists {
                series: series.to_string(),
                version,
            })
        }
    }

    pub fn get(&self, series: &str, version: Version) -> ServingResult<Vec<u8>> {
        self.store
            .get(&self.keys.artifact(series, version))?
            .ok_or_else(|| ServingError::not_found(series, version))
    }

    pub fn exists(&self, series: &str, version: Version) -> ServingResult<bool> {
        Ok(self
            .store
            .get(&self.keys.artifact(series, version))?
            .is_some())
    }
}
