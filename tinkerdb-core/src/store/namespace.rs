/*
    namespace.rs - One tenant's key space

    Values are owned by the namespace. Writes take ownership of (or copy) the
    caller's bytes and reads hand back a fresh Vec, so neither side can observe
    the other's later mutations.
*/

use crate::store::errors::{StoreError, StoreResult};
use crate::store::lock;
use std::collections::HashMap;
use std::sync::RwLock;

/// Key-value map for a single tenant.
///
/// Reads share the lock; `set` and `delete` hold it exclusively. The lock
/// covers this namespace only, so tenants never contend with each other here.
#[derive(Debug, Default)]
pub struct TenantNamespace {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl TenantNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Accepts anything convertible into an owned buffer: a borrowed slice is
    /// copied, an owned `Vec` is moved in.
    pub fn set(&self, key: &str, value: impl Into<Vec<u8>>) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        // Build the owned value before taking the lock.
        let value = value.into();
        lock::write(&self.data).insert(key.to_owned(), value);
        Ok(())
    }

    /// Copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        lock::read(&self.data).get(key).cloned()
    }

    /// Remove `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        lock::write(&self.data).remove(key).is_some()
    }

    pub fn exists(&self, key: &str) -> bool {
        lock::read(&self.data).contains_key(key)
    }

    /// Snapshot of the stored keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        lock::read(&self.data).keys().cloned().collect()
    }

    /// Number of stored keys.
    pub fn size(&self) -> usize {
        lock::read(&self.data).len()
    }
}
