//! ServingConfig - layered configuration for the serving store.
//!
//! Defaults first, then environment variables such as
//! `MODEL_STORE__KEY_PREFIX=staging` or `MODEL_STORE__LATEST_POLICY=last_writer_wins`.
//! Connection settings and timeouts belong to the `KvStore` implementation.

use serde::Deserialize;

use crate::keys::{ModelKeys, DEFAULT_PREFIX};
use crate::pointer::LatestPolicy;

pub const ENV_PREFIX: &str = "MODEL_STORE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServingConfig {
    pub key_prefix: String,
    pub latest_policy: LatestPolicy,
}

impl Default for ServingConfig {
    fn default() -> Self {
        ServingConfig {
            key_prefix: DEFAULT_PREFIX.to_string(),
            latest_policy: LatestPolicy::default(),
        }
    }
}

impl ServingConfig {
    /// Load from `MODEL_STORE__*` environment variables over the defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    pub fn load_with_prefix(prefix: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("key_prefix", DEFAULT_PREFIX)?
            .add_source(config::Environment::with_prefix(prefix).separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn keys(&self) -> ModelKeys {
        ModelKeys::new(self.key_prefix.clone())
    }
}
