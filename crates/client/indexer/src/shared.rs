//! Shared state containers with explicit read/write capabilities.
//!
//! The component that owns a piece of client state holds the [`SharedStore`]
//! and may mutate it; everything else receives a [`StoreReader`] that can only
//! look. Locks are synchronous and must never be held across an `.await`.

use std::sync::{Arc, PoisonError, RwLock};

/// Writable handle to a piece of shared client state.
#[derive(Debug, Default)]
pub struct SharedStore<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> SharedStore<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Read-only capability over the same state.
    pub fn reader(&self) -> StoreReader<T> {
        StoreReader {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> SharedStore<T> {
    pub fn snapshot(&self) -> T {
        self.read(T::clone)
    }
}

impl<T> Clone for SharedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only handle to shared client state.
#[derive(Debug)]
pub struct StoreReader<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> StoreReader<T> {
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

impl<T: Clone> StoreReader<T> {
    pub fn snapshot(&self) -> T {
        self.read(T::clone)
    }
}

impl<T> Clone for StoreReader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
