//! LatestPointer - the per-series alias naming the current version.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::CodecError;
use crate::error::ServingResult;
use crate::keys::ModelKeys;
use crate::kv::KvStore;
use crate::version::Version;

/// How `LatestPointer::advance` treats a pointer that is already set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatestPolicy {
    /// Compare-and-swap; the pointer only ever moves to a higher version, so
    /// saves that finish out of order still leave it on the newest model.
    #[default]
    Monotonic,
    /// Plain overwrite; the last save to finish wins even if it is older.
    LastWriterWins,
}

/// Outcome of an advance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { from: Option<Version>, to: Version },
    /// The pointer already names this version or a newer one.
    Superseded(Version),
}

#[derive(Clone)]
pub struct LatestPointer<S> {
    store: S,
    keys: ModelKeys,
    policy: LatestPolicy,
}

impl<S: KvStore> LatestPointer<S> {
    pub fn new(store: S, keys: ModelKeys, policy: LatestPolicy) -> Self {
        LatestPointer {
            store,
            keys,
            policy,
        }
    }

    pub fn policy(&self) -> LatestPolicy {
        self.policy
    }

    /// Current version, or None if no save has ever published.
    pub fn get(&self, series: &str) -> ServingResult<Option<Version>> {
        let raw = self.store.get(&self.keys.latest(series))?;
        Ok(raw.as_deref().map(parse_pointer).transpose()?)
    }

    pub fn advance(&self, series: &str, version: Version) -> ServingResult<Advance> {
        match self.policy {
            LatestPolicy::LastWriterWins => self.overwrite(series, version),
            LatestPolicy::Monotonic => self.advance_monotonic(series, version),
        }
    }

    fn overwrite(&self, series: &str, version: Version) -> ServingResult<Advance> {
        let from = self.get(series)?;
        self.store
            .set(&self.keys.latest(series), version.to_string().into_bytes())?;
        Ok(Advance::Moved { from, to: version })
    }

    fn advance_monotonic(&self, series: &str, version: Version) -> ServingResult<Advance> {
        let key = self.keys.latest(series);
        let candidate = version.to_string().into_bytes();
        // A lost swap means another writer moved the pointer; re-read and decide again.
        loop {
            let raw = self.store.get(&key)?;
            let current = raw.as_deref().map(parse_pointer).transpose()?;

            if let Some(current) = current {
                if current == version {
                    debug!(series, %version, "latest pointer already set");
                    return Ok(Advance::Superseded(current));
                }
                if current > version {
                    warn!(series, %version, latest = %current, "newer version already published");
                    return Ok(Advance::Superseded(current));
                }
            }

            if self
                .store
                .compare_and_swap(&key, raw.as_deref(), candidate.clone())?
            {
                return Ok(Advance::Moved {
                    from: current,
                    to: version,
                });
            }
        }
    }
}

fn parse_pointer(bytes: &[u8]) -> Result<Version, CodecError> {
    std::str::from_utf8(bytes)
        .map_err(|_| CodecError::MalformedVersion(String::from_utf8_lossy(bytes).into_owned()))?
        .parse()
}
