//! TinkerDB core: the multi-tenant in-memory store and the ambient services
//! (configuration, logging, metrics, shutdown) shared by the server and CLI.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod shutdown;
pub mod store;

pub use config::Config;
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogLevel};
pub use store::{StoreError, StoreResult, TenantNamespace, TenantRegistry};
