//! # Scoped Disposer
//!
//! Wraps a single deferred cleanup action behind one `release` operation.
//!
//! # Example
//!
//! ```rust
//! use hubproxy_core::ScopedDisposer;
//! use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
//!
//! let detached = Arc::new(AtomicBool::new(false));
//! let flag = detached.clone();
//! let mut disposer = ScopedDisposer::new(move || flag.store(true, Ordering::SeqCst));
//!
//! disposer.release();
//! assert!(detached.load(Ordering::SeqCst));
//! ```

use std::fmt;

type Action = Box<dyn FnOnce() + Send + Sync + 'static>;

/// A capability that runs a cleanup action at most once.
///
/// The action runs on the first call to [`release`](Self::release), or when
/// the disposer is dropped if it was never released. Releasing a disposer
/// that holds no action, or one that was already released, does nothing.
#[must_use = "dropping a ScopedDisposer runs its action immediately"]
pub struct ScopedDisposer {
    action: Option<Action>,
}

impl ScopedDisposer {
    /// Create a disposer that runs `action` when released.
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// Create a disposer from an optional action.
    pub fn from_option<F>(action: Option<F>) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            action: action.map(|f| Box::new(f) as Action),
        }
    }

    /// Create a disposer with nothing to release.
    pub fn noop() -> Self {
        Self { action: None }
    }

    /// Run the stored action if it has not run yet.
    pub fn release(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }

    /// Returns `true` if there is no action left to run.
    pub fn is_released(&self) -> bool {
        self.action.is_none()
    }
}

impl Default for ScopedDisposer {
    fn default() -> Self {
        Self::noop()
    }
}

impl Drop for ScopedDisposer {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ScopedDisposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedDisposer")
            .field("released", &self.is_released())
            .finish()
    }
}
