//! InMemoryKvStore - HashMap-backed key-value store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{KvError, KvStore};

/// Internal stored representation of a value.
#[derive(Clone, Debug)]
enum StoredValue {
    Counter(u64),
    Bytes(Vec<u8>),
    List(Vec<String>),
}

/// In-memory key-value store backed by a HashMap.
///
/// Every primitive runs under one write lock, which makes it linearizable.
/// Clone-friendly via Arc (cloning shares the same underlying storage).
#[derive(Clone)]
pub struct InMemoryKvStore {
    storage: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of keys currently held.
    pub fn len(&self) -> Result<usize, KvError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| KvError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, KvError> {
        Ok(self.len()? == 0)
    }
}

fn wrong_type(key: &str) -> KvError {
    KvError::WrongType {
        key: key.to_string(),
    }
}

impl KvStore for InMemoryKvStore {
    fn incr(&self, key: &str) -> Result<u64, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::LockPoisoned("incr"))?;

        let next = match storage.get(key) {
            None => 1,
            Some(StoredValue::Counter(n)) => n.checked_add(1).ok_or_else(|| KvError::Overflow {
                key: key.to_string(),
            })?,
            Some(_) => return Err(wrong_type(key)),
        };
        storage.insert(key.to_string(), StoredValue::Counter(next));
        Ok(next)
    }

    fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<bool, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::LockPoisoned("put_if_absent"))?;

        if storage.contains_key(key) {
            return Ok(false);
        }
        storage.insert(key.to_string(), StoredValue::Bytes(bytes));
        Ok(true)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| KvError::LockPoisoned("get"))?;

        match storage.get(key) {
            None => Ok(None),
            Some(StoredValue::Bytes(bytes)) => Ok(Some(bytes.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn set(&self, key: &str, bytes: Vec<u8>) -> Result<(), KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::LockPoisoned("set"))?;

        match storage.get(key) {
            None | Some(StoredValue::Bytes(_)) => {
                storage.insert(key.to_string(), StoredValue::Bytes(bytes));
                Ok(())
            }
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::LockPoisoned("compare_and_swap"))?;

        let current = match storage.get(key) {
            None => None,
            Some(StoredValue::Bytes(bytes)) => Some(bytes.as_slice()),
            Some(_) => return Err(wrong_type(key)),
        };
        if current != expected {
            return Ok(false);
        }
        storage.insert(key.to_string(), StoredValue::Bytes(new));
        Ok(true)
    }

    fn append(&self, key: &str, item: &str) -> Result<u64, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::LockPoisoned("append"))?;

        let entry = storage
            .entry(key.to_string())
            .or_insert_with(|| StoredValue::List(Vec::new()));
        match entry {
            StoredValue::List(items) => {
                items.push(item.to_string());
                Ok(items.len() as u64)
            }
            _ => Err(wrong_type(key)),
        }
    }

    fn append_if_absent(&self, key: &str, item: &str) -> Result<bool, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::LockPoisoned("append_if_absent"))?;

        let entry = storage
            .entry(key.to_string())
            .or_insert_with(|| StoredValue::List(Vec::new()));
        match entry {
            StoredValue::List(items) if items.iter().any(|existing| existing == item) => Ok(false),
            StoredValue::List(items) => {
                items.push(item.to_string());
                Ok(true)
            }
            _ => Err(wrong_type(key)),
        }
    }

    fn list(&self, key: &str) -> Result<Vec<String>, KvError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| KvError::LockPoisoned("list"))?;

        match storage.get(key) {
            None => Ok(Vec::new()),
            Some(StoredValue::List(items)) => Ok(items.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }
}
