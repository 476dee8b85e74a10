/*
    store - Multi-tenant in-memory key-value storage

    Two levels of mapping, each behind its own reader/writer lock:
    - TenantRegistry: tenant ID -> TenantNamespace
    - TenantNamespace: key -> value bytes

    Nothing here is persisted. The registry lives as long as the process.
*/

pub mod errors;
mod lock;
pub mod namespace;
pub mod registry;

pub use errors::{StoreError, StoreResult};
pub use namespace::TenantNamespace;
pub use registry::TenantRegistry;
