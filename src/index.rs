//! VersionIndex - append-only audit list of the versions stored per series.

use crate::error::{ServingError, ServingResult};
use crate::keys::ModelKeys;
use crate::kv::KvStore;
use crate::version::Version;

/// Ordered record of published versions.
///
/// Entries appear in publish-completion order, which under concurrent saves
/// need not match numeric order.
#[derive(Clone)]
pub struct VersionIndex<S> {
    store: S,
    keys: ModelKeys,
}

impl<S: KvStore> VersionIndex<S> {
    pub fn new(store: S, keys: ModelKeys) -> Self {
        VersionIndex { store, keys }
    }

    pub fn append(&self, series: &str, version: Version) -> ServingResult<()> {
        self.store
            .append(&self.keys.versions(series), &version.to_string())?;
        Ok(())
    }

    /// Append unless the version is already listed; one atomic store step.
    pub fn append_if_absent(&self, series: &str, version: Version) -> ServingResult<bool> {
        Ok(self
            .store
            .append_if_absent(&self.keys.versions(series), &version.to_string())?)
    }

    pub fn list(&self, series: &str) -> ServingResult<Vec<Version>> {
        self.store
            .list(&self.keys.versions(series))?
            .iter()
            .map(|raw| raw.parse::<Version>().map_err(ServingError::from))
            .collect()
    }

    pub fn contains(&self, series: &str, version: Version) -> ServingResult<bool> {
        Ok(self.list(series)?.contains(&version))
    }
}
