//! A KvStore wrapper that fails chosen primitives on demand.
//!
//! Lets tests drive the store-outage paths without a real network store.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use versioned_models::{InMemoryKvStore, KvError, KvStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Incr,
    PutIfAbsent,
    Get,
    Set,
    CompareAndSwap,
    Append,
    List,
}

#[derive(Clone, Default)]
pub struct FlakyKvStore {
    inner: InMemoryKvStore,
    failing: Arc<Mutex<HashSet<Op>>>,
}

impl FlakyKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the underlying data, bypassing injected failures.
    pub fn inner(&self) -> &InMemoryKvStore {
        &self.inner
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn check(&self, op: Op) -> Result<(), KvError> {
        if self.failing.lock().unwrap().contains(&op) {
            Err(KvError::Unavailable(format!("injected failure on {op:?}")))
        } else {
            Ok(())
        }
    }
}

impl KvStore for FlakyKvStore {
    fn incr(&self, key: &str) -> Result<u64, KvError> {
        self.check(Op::Incr)?;
        self.inner.incr(key)
    }

    fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<bool, KvError> {
        self.check(Op::PutIfAbsent)?;
        self.inner.put_if_absent(key, bytes)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        self.check(Op::Get)?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, bytes: Vec<u8>) -> Result<(), KvError> {
        self.check(Op::Set)?;
        self.inner.set(key, bytes)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, KvError> {
        self.check(Op::CompareAndSwap)?;
        self.inner.compare_and_swap(key, expected, new)
    }

    fn append(&self, key: &str, item: &str) -> Result<u64, KvError> {
        self.check(Op::Append)?;
        self.inner.append(key, item)
    }

    fn append_if_absent(&self, key: &str, item: &str) -> Result<bool, KvError> {
        self.check(Op::Append)?;
        self.inner.append_if_absent(key, item)
    }

    fn list(&self, key: &str) -> Result<Vec<String>, KvError> {
        self.check(Op::List)?;
        self.inner.list(key)
    }
}
