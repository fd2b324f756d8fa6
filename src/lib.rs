//! Versioned model store: atomic version allocation, write-once artifacts,
//! a monotonic latest pointer and an append-only version index, all on top
//! of a pluggable key-value handle.

mod allocator;
mod artifact;
mod codec;
mod error;
mod index;
mod keys;
mod kv;
mod metrics;
mod pipeline;
mod pointer;
mod serving;
mod settings;
mod version;

pub use allocator::VersionAllocator;
pub use artifact::ArtifactStore;
pub use codec::{Artifact, CodecError, ModelCodec, ModelState, FORMAT_ENVELOPE, FORMAT_FIXED_F64};
pub use error::{ServingError, ServingResult};
pub use index::VersionIndex;
pub use keys::{ModelKeys, DEFAULT_PREFIX};
pub use kv::{InMemoryKvStore, KvError, KvStore};
pub use metrics::{HealthSummary, LatencySummary, ServingMetrics};
pub use pipeline::{fit, DataPoint, Prediction, Predictor, TrainOutcome, Trainer};
pub use pointer::{Advance, LatestPointer, LatestPolicy};
pub use serving::{ServingStore, VersionRecord};
pub use settings::{ServingConfig, ENV_PREFIX};
pub use version::{Version, VersionSelector};
