mod admin_service;
mod kv_service;

pub use admin_service::TenantAdminService;
pub use kv_service::KvStoreService;

use tinkerdb_core::StoreError;

// Response messages. The client matches on the "not found" ones.
pub const KEY_SET: &str = "key set successfully";
pub const KEY_FOUND: &str = "key found";
pub const KEY_DELETED: &str = "key deleted successfully";
pub const KEY_NOT_FOUND: &str = "key not found";
pub const TENANT_DELETED: &str = "tenant deleted successfully";
pub const TENANT_NOT_FOUND: &str = "tenant not found";

/// Reject empty identifiers before they reach the store.
fn validate(tenant_id: &str, key: Option<&str>) -> Result<(), StoreError> {
    if tenant_id.is_empty() {
        return Err(StoreError::EmptyTenant);
    }
    if key.is_some_and(str::is_empty) {
        return Err(StoreError::EmptyKey);
    }
    Ok(())
}
