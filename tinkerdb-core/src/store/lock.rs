/*
    lock.rs - Poison-tolerant lock acquisition

    Every critical section in the store is a single HashMap call, so a thread
    that panicked while holding a guard cannot have left the map half-updated.
    The guard is recovered instead of surfacing a poison error.
*/

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
