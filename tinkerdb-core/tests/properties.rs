//! Property tests for tenant isolation, copy semantics and delete semantics

use proptest::prelude::*;
use tinkerdb_core::{StoreError, TenantRegistry};

fn ident() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}"
}

proptest! {
    #[test]
    fn writes_are_isolated_between_tenants(
        t1 in ident(),
        t2 in ident(),
        key in ident(),
        v1 in proptest::collection::vec(any::<u8>(), 0..256),
        v2 in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        prop_assume!(t1 != t2);
        let store = TenantRegistry::new();

        store.set(&t2, &key, v2.clone()).unwrap();
        let keys_before = store.keys(&t2);
        store.set(&t1, &key, v1.clone()).unwrap();

        prop_assert_eq!(store.get(&t2, &key), Some(v2));
        prop_assert_eq!(store.get(&t1, &key), Some(v1));
        prop_assert_eq!(store.keys(&t2), keys_before);

        store.delete(&t1, &key);
        prop_assert!(store.exists(&t2, &key));
    }

    #[test]
    fn stored_values_are_independent_copies(
        key in ident(),
        mut value in proptest::collection::vec(any::<u8>(), 1..256),
    ) {
        let store = TenantRegistry::new();
        let original = value.clone();

        store.set("tenant", &key, value.as_slice()).unwrap();
        for b in value.iter_mut() {
            *b = b.wrapping_add(1);
        }
        let mut fetched = store.get("tenant", &key).unwrap();
        prop_assert_eq!(&fetched, &original);

        for b in fetched.iter_mut() {
            *b = b.wrapping_add(1);
        }
        prop_assert_eq!(store.get("tenant", &key).unwrap(), original);
    }

    #[test]
    fn delete_is_idempotent(keys in proptest::collection::hash_set(ident(), 1..16)) {
        let store = TenantRegistry::new();
        for key in &keys {
            store.set("tenant", key, key.as_bytes()).unwrap();
        }

        for key in &keys {
            prop_assert!(store.delete("tenant", key));
            prop_assert!(!store.delete("tenant", key));
        }
        prop_assert!(store.keys("tenant").is_empty());
        prop_assert_eq!(store.tenant_count(), 1);
    }

    #[test]
    fn reads_on_unknown_tenants_create_nothing(tenant in ident(), key in ident()) {
        let store = TenantRegistry::new();

        prop_assert_eq!(store.get(&tenant, &key), None);
        prop_assert!(!store.exists(&tenant, &key));
        prop_assert!(!store.delete(&tenant, &key));
        prop_assert!(store.keys(&tenant).is_empty());
        prop_assert_eq!(store.tenant_count(), 0);
    }

    #[test]
    fn empty_inputs_store_nothing(
        tenant in ident(),
        key in ident(),
        value in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let store = TenantRegistry::new();

        prop_assert_eq!(store.set("", &key, value.clone()), Err(StoreError::EmptyTenant));
        prop_assert_eq!(store.set(&tenant, "", value), Err(StoreError::EmptyKey));
        prop_assert_eq!(store.tenant_count(), 0);
    }
}
