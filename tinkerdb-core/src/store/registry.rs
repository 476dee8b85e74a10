/*
    registry.rs - Tenant routing

    Maps tenant IDs to their namespaces and forwards each operation to exactly
    one of them. Namespaces are created on the first successful write; reads,
    deletes and listings against an unknown tenant answer "not found" without
    creating anything.

    Locking:
    - The registry lock only guards the tenant map itself (lookup, insert,
      remove of a namespace entry).
    - Key-level work runs under the namespace's own lock after the registry
      lock has been released, so the two are never held together.
*/

use crate::store::errors::{StoreError, StoreResult};
use crate::store::lock;
use crate::store::namespace::TenantNamespace;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Registry of every tenant's namespace.
///
/// Construct one per process and share it by reference (usually behind an
/// `Arc`) with the request layer.
#[derive(Debug, Default)]
pub struct TenantRegistry {
    tenants: RwLock<HashMap<String, Arc<TenantNamespace>>>,
}

impl TenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing namespace for `tenant`, if any. Never creates one.
    fn lookup(&self, tenant: &str) -> Option<Arc<TenantNamespace>> {
        if tenant.is_empty() {
            return None;
        }
        lock::read(&self.tenants).get(tenant).cloned()
    }

    /// Namespace for `tenant`, created if missing.
    ///
    /// The shared lookup serves the common case. On a miss the exclusive lock
    /// is taken and the entry checked again, because another writer may have
    /// created the namespace between the two acquisitions.
    fn lookup_or_create(&self, tenant: &str) -> Arc<TenantNamespace> {
        if let Some(namespace) = self.lookup(tenant) {
            return namespace;
        }

        let mut tenants = lock::write(&self.tenants);
        match tenants.entry(tenant.to_owned()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                debug!(tenant, "creating tenant namespace");
                entry.insert(Arc::new(TenantNamespace::new())).clone()
            }
        }
    }

    /// Store `value` under `key` for `tenant`.
    ///
    /// Both inputs are validated before any namespace is created, so a
    /// rejected write leaves the registry untouched.
    pub fn set(&self, tenant: &str, key: &str, value: impl Into<Vec<u8>>) -> StoreResult<()> {
        if tenant.is_empty() {
            return Err(StoreError::EmptyTenant);
        }
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        self.lookup_or_create(tenant).set(key, value)
    }

    pub fn get(&self, tenant: &str, key: &str) -> Option<Vec<u8>> {
        self.lookup(tenant)?.get(key)
    }

    pub fn delete(&self, tenant: &str, key: &str) -> bool {
        self.lookup(tenant)
            .map(|namespace| namespace.delete(key))
            .unwrap_or(false)
    }

    pub fn exists(&self, tenant: &str, key: &str) -> bool {
        self.lookup(tenant)
            .map(|namespace| namespace.exists(key))
            .unwrap_or(false)
    }

    /// Keys stored for `tenant`; empty for unknown tenants.
    pub fn keys(&self, tenant: &str) -> Vec<String> {
        self.lookup(tenant)
            .map(|namespace| namespace.keys())
            .unwrap_or_default()
    }

    /// Number of tenants that currently have a namespace, including ones
    /// whose keys have all been deleted.
    pub fn tenant_count(&self) -> usize {
        lock::read(&self.tenants).len()
    }

    /// Identifiers of every tenant that has a namespace.
    pub fn tenants(&self) -> Vec<String> {
        lock::read(&self.tenants).keys().cloned().collect()
    }

    /// Number of keys stored for `tenant`, or `None` if it has no namespace.
    pub fn key_count(&self, tenant: &str) -> Option<usize> {
        self.lookup(tenant).map(|namespace| namespace.size())
    }

    /// Drop `tenant`'s namespace with all of its keys in one step.
    ///
    /// An operation that resolved the namespace just before removal finishes
    /// against the detached namespace and is discarded with it.
    pub fn delete_tenant(&self, tenant: &str) -> bool {
        let removed = lock::write(&self.tenants).remove(tenant);
        if removed.is_some() {
            debug!(tenant, "deleted tenant namespace");
        }
        removed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scenario() {
        let store = TenantRegistry::new();

        store.set("t1", "greeting", b"hi".as_slice()).unwrap();
        assert_eq!(store.get("t1", "greeting"), Some(b"hi".to_vec()));
        assert_eq!(store.get("t1", "missing"), None);

        store.set("t1", "k", b"a".as_slice()).unwrap();
        store.set("t2", "k", b"b".as_slice()).unwrap();
        assert_eq!(store.get("t1", "k"), Some(b"a".to_vec()));
        assert_eq!(store.get("t2", "k"), Some(b"b".to_vec()));

        assert!(store.delete("t1", "greeting"));
        assert!(!store.exists("t1", "greeting"));
    }

    #[test]
    fn test_multi_tenant_isolation() {
        let store = TenantRegistry::new();

        store.set("tenant1", "shared-key", b"tenant1-value".as_slice()).unwrap();
        store.set("tenant2", "shared-key", b"tenant2-value".as_slice()).unwrap();

        assert_eq!(store.get("tenant1", "shared-key").unwrap(), b"tenant1-value");
        assert_eq!(store.get("tenant2", "shared-key").unwrap(), b"tenant2-value");

        assert!(store.delete("tenant1", "shared-key"));
        assert!(!store.exists("tenant1", "shared-key"));
        assert!(store.exists("tenant2", "shared-key"));
    }

    #[test]
    fn test_empty_tenant_id() {
        let store = TenantRegistry::new();

        assert_eq!(store.set("", "key", b"value".as_slice()), Err(StoreError::EmptyTenant));
        assert_eq!(store.get("", "key"), None);
        assert!(!store.delete("", "key"));
        assert!(!store.exists("", "key"));
        assert!(store.keys("").is_empty());
        assert_eq!(store.key_count(""), None);
        assert_eq!(store.tenant_count(), 0);
    }

    #[test]
    fn test_empty_key_creates_nothing() {
        let store = TenantRegistry::new();

        assert_eq!(store.set("tenant", "", b"value".as_slice()), Err(StoreError::EmptyKey));
        assert_eq!(store.tenant_count(), 0);
        assert!(store.keys("tenant").is_empty());
    }

    #[test]
    fn test_empty_tenant_wins_over_empty_key() {
        let store = TenantRegistry::new();
        assert_eq!(store.set("", "", b"value".as_slice()), Err(StoreError::EmptyTenant));
    }

    #[test]
    fn test_reads_never_create_tenants() {
        let store = TenantRegistry::new();

        assert_eq!(store.get("ghost", "k"), None);
        assert!(!store.exists("ghost", "k"));
        assert!(!store.delete("ghost", "k"));
        assert!(store.keys("ghost").is_empty());
        assert_eq!(store.key_count("ghost"), None);

        assert_eq!(store.tenant_count(), 0);
    }

    #[test]
    fn test_keys() {
        let store = TenantRegistry::new();
        for key in ["a", "b", "c"] {
            store.set("t1", key, b"v".as_slice()).unwrap();
        }

        let keys: HashSet<String> = store.keys("t1").into_iter().collect();
        let expected: HashSet<String> = ["a", "b", "c"].iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_tenant_count() {
        let store = TenantRegistry::new();
        assert_eq!(store.tenant_count(), 0);

        store.set("tenant1", "key", b"value".as_slice()).unwrap();
        assert_eq!(store.tenant_count(), 1);

        store.set("tenant2", "key", b"value".as_slice()).unwrap();
        assert_eq!(store.tenant_count(), 2);

        // Another key in an existing tenant doesn't add a tenant
        store.set("tenant1", "key2", b"value2".as_slice()).unwrap();
        assert_eq!(store.tenant_count(), 2);
    }

    #[test]
    fn test_emptied_tenant_still_counts() {
        let store = TenantRegistry::new();
        store.set("tenant", "key", b"value".as_slice()).unwrap();
        assert!(store.delete("tenant", "key"));

        assert_eq!(store.tenant_count(), 1);
        assert_eq!(store.key_count("tenant"), Some(0));
    }

    #[test]
    fn test_delete_tenant() {
        let store = TenantRegistry::new();
        store.set("test-tenant", "key1", b"value1".as_slice()).unwrap();
        store.set("test-tenant", "key2", b"value2".as_slice()).unwrap();
        store.set("other", "key1", b"kept".as_slice()).unwrap();

        assert!(store.delete_tenant("test-tenant"));
        assert_eq!(store.tenant_count(), 1);
        assert_eq!(store.get("test-tenant", "key1"), None);
        assert!(store.keys("test-tenant").is_empty());
        assert_eq!(store.get("other", "key1"), Some(b"kept".to_vec()));

        assert!(!store.delete_tenant("test-tenant"));
    }

    #[test]
    fn test_tenant_recreated_after_delete() {
        let store = TenantRegistry::new();
        store.set("t", "old", b"1".as_slice()).unwrap();
        store.delete_tenant("t");

        store.set("t", "new", b"2".as_slice()).unwrap();

        assert_eq!(store.keys("t"), vec!["new".to_string()]);
    }

    #[test]
    fn test_tenants_and_key_count() {
        let store = TenantRegistry::new();
        store.set("a", "k1", b"v".as_slice()).unwrap();
        store.set("a", "k2", b"v".as_slice()).unwrap();
        store.set("b", "k1", b"v".as_slice()).unwrap();

        let mut tenants = store.tenants();
        tenants.sort();
        assert_eq!(tenants, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.key_count("a"), Some(2));
        assert_eq!(store.key_count("b"), Some(1));
    }

    #[test]
    fn test_value_isolation() {
        let store = TenantRegistry::new();

        let mut original = b"original".to_vec();
        store.set("tenant", "key", original.as_slice()).unwrap();
        original[0] = b'X';

        let mut retrieved = store.get("tenant", "key").unwrap();
        assert_eq!(retrieved, b"original");
        retrieved[0] = b'Y';

        assert_eq!(store.get("tenant", "key").unwrap(), b"original");
    }
}
