//! ServingStore - the entry point training and prediction flows use.
//!
//! Saving runs in two phases:
//!
//! 1. **Durable write**: allocate a version, encode, write the artifact once.
//!    Any failure stops here and nothing is published.
//! 2. **Publish** (best effort): advance the latest pointer, append to the
//!    version index, then add the series to the trained-series list. A failure here is reported as
//!    [`ServingError::PublishIncomplete`]; the artifact is already durable and
//!    [`ServingStore::publish`] finishes the job without retraining.
//!
//! There is no cross-step transaction and no in-process lock. Every resolve
//! reads the store afresh; nothing is cached.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::allocator::VersionAllocator;
use crate::artifact::ArtifactStore;
use crate::codec::{Artifact, ModelCodec, ModelState};
use crate::error::{ServingError, ServingResult};
use crate::index::VersionIndex;
use crate::keys::ModelKeys;
use crate::kv::KvStore;
use crate::pointer::{Advance, LatestPointer};
use crate::settings::ServingConfig;
use crate::version::{Version, VersionSelector};

/// A stored model as seen by readers.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRecord {
    pub series_id: String,
    pub version: Version,
    pub state: ModelState,
    /// None for artifacts written in the fixed legacy layout.
    pub created_at: Option<DateTime<Utc>>,
    pub points_used: Option<u64>,
}

#[derive(Clone)]
pub struct ServingStore<S> {
    allocator: VersionAllocator<S>,
    artifacts: ArtifactStore<S>,
    latest: LatestPointer<S>,
    index: VersionIndex<S>,
    store: S,
    keys: ModelKeys,
}

impl<S: KvStore + Clone> ServingStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &ServingConfig::default())
    }

    pub fn with_config(store: S, config: &ServingConfig) -> Self {
        let keys = config.keys();
        ServingStore {
            allocator: VersionAllocator::new(store.clone(), keys.clone()),
            artifacts: ArtifactStore::new(store.clone(), keys.clone()),
            latest: LatestPointer::new(store.clone(), keys.clone(), config.latest_policy),
            index: VersionIndex::new(store.clone(), keys.clone()),
            store,
            keys,
        }
    }
}

impl<S: KvStore> ServingStore<S> {
    pub fn allocator(&self) -> &VersionAllocator<S> {
        &self.allocator
    }

    pub fn artifacts(&self) -> &ArtifactStore<S> {
        &self.artifacts
    }

    pub fn latest_pointer(&self) -> &LatestPointer<S> {
        &self.latest
    }

    pub fn index(&self) -> &VersionIndex<S> {
        &self.index
    }

    /// Store `state` under a freshly allocated version and publish it.
    pub fn save_new_version(&self, series: &str, state: &ModelState) -> ServingResult<Version> {
        self.save(series, stamped(*state, None))
    }

    /// Like [`save_new_version`](Self::save_new_version), also recording how
    /// many points the model was fitted on.
    pub fn save_trained(
        &self,
        series: &str,
        state: &ModelState,
        points_used: u64,
    ) -> ServingResult<Version> {
        self.save(series, stamped(*state, Some(points_used)))
    }

    fn save(&self, series: &str, artifact: Artifact) -> ServingResult<Version> {
        let version = self.allocator.allocate(series)?;
        let bytes = ModelCodec::encode(&artifact)?;

        if let Err(err) = self.artifacts.put(series, version, bytes) {
            if matches!(err, ServingError::AlreadyExists { .. }) {
                error!(
                    series,
                    %version,
                    "artifact key already occupied; version counter is behind stored artifacts"
                );
            }
            return Err(err);
        }

        let published = self
            .latest
            .advance(series, version)
            .and_then(|_| self.index.append(series, version))
            .and_then(|_| self.record_trained(series));
        if let Err(source) = published {
            warn!(series, %version, error = %source, "artifact stored but publish failed");
            return Err(ServingError::PublishIncomplete {
                series: series.to_string(),
                version,
                source: Box::new(source),
            });
        }

        info!(series, %version, "published model version");
        Ok(version)
    }

    /// Re-run the publish phase for an artifact that is already stored.
    ///
    /// Safe to repeat, including concurrently: the pointer only moves forward
    /// under the monotonic policy, and the index gains the version at most
    /// once because the check and the append are a single store primitive.
    pub fn publish(&self, series: &str, version: Version) -> ServingResult<Advance> {
        if !self.artifacts.exists(series, version)? {
            return Err(ServingError::not_found(series, version));
        }
        let advance = self.latest.advance(series, version)?;
        self.index.append_if_absent(series, version)?;
        self.record_trained(series)?;
        info!(series, %version, ?advance, "republished model version");
        Ok(advance)
    }

    pub fn resolve_model(
        &self,
        series: &str,
        selector: VersionSelector,
    ) -> ServingResult<VersionRecord> {
        let version = match selector {
            VersionSelector::Exact(version) => version,
            VersionSelector::Latest => match self.latest.get(series)? {
                Some(version) => version,
                None => {
                    debug!(series, "no published version");
                    return Err(ServingError::not_found(series, selector));
                }
            },
        };

        let bytes = self.artifacts.get(series, version).inspect_err(|err| {
            if err.is_not_found() {
                debug!(series, %version, "artifact not found");
            }
        })?;
        let artifact = ModelCodec::decode(&bytes).inspect_err(|err| {
            warn!(series, %version, error = %err, "stored artifact failed to decode");
        })?;

        debug!(series, %version, "resolved model");
        Ok(VersionRecord {
            series_id: series.to_string(),
            version,
            state: artifact.state,
            created_at: artifact
                .created_at_ms
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            points_used: artifact.points_used,
        })
    }

    pub fn latest_version(&self, series: &str) -> ServingResult<Option<Version>> {
        self.latest.get(series)
    }

    /// Every published version, in publish-completion order.
    pub fn list_versions(&self, series: &str) -> ServingResult<Vec<Version>> {
        self.index.list(series)
    }

    /// Number of distinct series with at least one published version.
    pub fn series_trained(&self) -> ServingResult<u64> {
        Ok(self.store.list(&self.keys.trained_series())?.len() as u64)
    }

    fn record_trained(&self, series: &str) -> ServingResult<()> {
        self.store
            .append_if_absent(&self.keys.trained_series(), series)?;
        Ok(())
    }
}

fn stamped(state: ModelState, points_used: Option<u64>) -> Artifact {
    Artifact {
        state,
        created_at_ms: Some(Utc::now().timestamp_millis()),
        points_used,
    }
}
