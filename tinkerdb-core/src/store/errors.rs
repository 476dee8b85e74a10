/*
    errors.rs - Error types for the store subsystem

    Missing tenants and keys are not errors: reads and deletes report them
    through Option/bool results instead.
*/

use thiserror::Error;

/// Input rejected by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Tenant identifier was the empty string
    #[error("tenant ID cannot be empty")]
    EmptyTenant,

    /// Key was the empty string on a write
    #[error("key cannot be empty")]
    EmptyKey,
}

pub type StoreResult<T> = Result<T, StoreError>;
