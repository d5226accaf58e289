//! Disposable capability and the function-backed adapter.
//!
//! [`Dispose`] is the crate's resource-release seam: anything holding an
//! external registration (a listener, a subscription, a file handle) exposes
//! an idempotent `dispose()`. The common handle type is [`DisposeRef`], an
//! `Arc<dyn Dispose>` suitable for collecting into a
//! [`DisposableRegistry`](crate::DisposableRegistry).

use std::sync::{Arc, Mutex, PoisonError};

/// Capability for releasing a held resource.
///
/// ## Contract
/// - `dispose()` is idempotent: the release runs at most once, every later
///   call is a no-op.
/// - Safe to call from any thread.
pub trait Dispose: Send + Sync {
    /// Releases the held resource. Idempotent.
    fn dispose(&self);
}

/// Shared handle to a disposable resource.
pub type DisposeRef = Arc<dyn Dispose>;

/// Function-backed disposable.
///
/// Wraps a teardown closure and guarantees it runs at most once, no matter how
/// many times (or from how many threads) `dispose()` is called.
///
/// # Example
/// ```
/// use taskstream::{Dispose, DisposeFn};
///
/// let guard = DisposeFn::new(|| println!("released"));
/// guard.dispose();
/// guard.dispose(); // no-op
/// ```
pub struct DisposeFn {
    teardown: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl DisposeFn {
    /// Creates a disposable from a teardown closure.
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// Creates the disposable and returns it as a shared handle.
    ///
    /// Prefer this when the result goes straight into a
    /// [`DisposableRegistry`](crate::DisposableRegistry).
    pub fn arc(teardown: impl FnOnce() + Send + 'static) -> DisposeRef {
        Arc::new(Self::new(teardown))
    }
}

impl Dispose for DisposeFn {
    fn dispose(&self) {
        let teardown = self
            .teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }
}
