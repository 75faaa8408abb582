//! Shared controller state
//!
//! Every controller keeps its cache behind a [`Shared`] cell. All cells of one
//! application share a single [`Revision`] counter, which the view layer polls
//! to decide when to re-render.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Monotonic change counter shared by every [`Shared`] cell of an app.
#[derive(Clone, Debug, Default)]
pub struct Revision(Arc<AtomicU64>);

impl Revision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Mutex-guarded state that bumps the app revision on every write.
///
/// Closures run with the lock held, so they must never await.
pub struct Shared<T> {
    inner: Arc<Mutex<T>>,
    revision: Revision,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            revision: self.revision.clone(),
        }
    }
}

impl<T> Shared<T> {
    pub fn new(value: T, revision: Revision) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
            revision,
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.lock());
        self.revision.bump();
        result
    }

    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        // A panic inside a closure leaves the data intact; keep serving it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Shared<T> {
    pub fn snapshot(&self) -> T {
        self.read(T::clone)
    }
}
