use thiserror::Error;

use crate::codec::CodecError;
use crate::kv::KvError;
use crate::version::{Version, VersionSelector};

pub type ServingResult<T> = Result<T, ServingError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServingError {
    /// No record exists for the requested series/version. Expected during
    /// normal operation.
    #[error("no model for series {series} at {selector}")]
    NotFound {
        series: String,
        selector: VersionSelector,
    },
    /// Stored bytes could not be decoded (corruption or format skew).
    #[error("encoding error: {0}")]
    Encoding(#[from] CodecError),
    /// The shared store failed; the caller may retry.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] KvError),
    /// A write-once artifact key was already occupied. The allocator should
    /// make this impossible.
    #[error("artifact {series}:{version} already exists")]
    AlreadyExists { series: String, version: Version },
    /// The artifact is durable but the latest pointer or the version index
    /// was not updated. Retry with `ServingStore::publish`.
    #[error("artifact {series}:{version} stored but not published: {source}")]
    PublishIncomplete {
        series: String,
        version: Version,
        source: Box<ServingError>,
    },
    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),
}

impl ServingError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServingError::StoreUnavailable(_) | ServingError::PublishIncomplete { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServingError::NotFound { .. })
    }

    pub(crate) fn not_found(series: &str, selector: impl Into<VersionSelector>) -> Self {
        ServingError::NotFound {
            series: series.to_string(),
            selector: selector.into(),
        }
    }
}
