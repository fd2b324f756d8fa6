//! Shared helpers for the integration suites.

#![allow(dead_code, unused_imports)]

pub mod flaky_store;

pub use flaky_store::{FlakyKvStore, Op};

use versioned_models::{ModelState, Version};

pub fn v(n: u64) -> Version {
    Version::new(n).unwrap()
}

pub fn state(mean: f64, std: f64) -> ModelState {
    ModelState::new(mean, std)
}
