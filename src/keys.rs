//! Key schema of the shared store.
//!
//! | Key | Value |
//! |---|---|
//! | `{prefix}:{series}:version_counter` | atomic counter |
//! | `{prefix}:{series}:{version}` | write-once artifact bytes |
//! | `{prefix}:{series}:latest` | `"vN"` |
//! | `{prefix}:{series}:versions` | list of `"vN"` |
//! | `{prefix}:trained_series` | list of series ids with a published version |

use crate::version::Version;

pub const DEFAULT_PREFIX: &str = "model";

/// Renders storage keys for a fixed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelKeys {
    prefix: String,
}

impl Default for ModelKeys {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl ModelKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn counter(&self, series: &str) -> String {
        format!("{}:{}:version_counter", self.prefix, series)
    }

    pub fn artifact(&self, series: &str, version: Version) -> String {
        format!("{}:{}:{}", self.prefix, series, version)
    }

    pub fn latest(&self, series: &str) -> String {
        format!("{}:{}:latest", self.prefix, series)
    }

    pub fn versions(&self, series: &str) -> String {
        format!("{}:{}:versions", self.prefix, series)
    }

    pub fn trained_series(&self) -> String {
        format!("{}:trained_series", self.prefix)
    }
}
