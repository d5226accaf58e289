//! Ordered collection of disposables tied to a lifecycle scope.
//!
//! A consumer's lifecycle boundary (a screen, a background job, a connection
//! handler) owns exactly one [`DisposableRegistry`], registers every
//! subscription it opens, and disposes the registry once at teardown.
//!
//! ## Rules
//! - `dispose()` releases every currently-held member exactly once, in
//!   insertion order, then clears the collection.
//! - Safe when empty; calling `dispose()` again is a no-op.
//! - Members added after a dispose join the next drain.
//! - The registry is a scope guard: `Drop` disposes whatever is still held, so
//!   early error returns release registered resources too.
//!
//! ## Example
//! ```
//! use taskstream::{DisposableRegistry, DisposeFn};
//!
//! let registry = DisposableRegistry::new();
//! registry.add(DisposeFn::arc(|| { /* detach listener */ }));
//! registry.dispose();
//! registry.dispose(); // no-op
//! ```

use std::sync::{Mutex, PoisonError};

use super::disposable::{Dispose, DisposeRef};

/// Ordered, thread-safe collection of disposables released together.
#[derive(Default)]
pub struct DisposableRegistry {
    members: Mutex<Vec<DisposeRef>>,
}

impl DisposableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a disposable. Members are released in insertion order.
    pub fn add(&self, disposable: DisposeRef) {
        self.lock_members().push(disposable);
    }

    /// Convenience: registers a bare teardown closure.
    pub fn defer(&self, teardown: impl FnOnce() + Send + 'static) {
        self.add(super::disposable::DisposeFn::arc(teardown));
    }

    /// Disposes every currently-held member exactly once and clears the
    /// collection. Safe when empty; repeated calls are no-ops.
    pub fn dispose(&self) {
        let drained: Vec<DisposeRef> = self.lock_members().drain(..).collect();
        for member in drained {
            member.dispose();
        }
    }

    /// Number of currently-held members.
    pub fn len(&self) -> usize {
        self.lock_members().len()
    }

    /// True if no members are currently held.
    pub fn is_empty(&self) -> bool {
        self.lock_members().is_empty()
    }

    fn lock_members(&self) -> std::sync::MutexGuard<'_, Vec<DisposeRef>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A registry is itself disposable, so scopes nest: a child registry can be
/// registered into a parent.
impl Dispose for DisposableRegistry {
    fn dispose(&self) {
        DisposableRegistry::dispose(self);
    }
}

/// Scope-guard behavior: whatever is still registered when the owning scope
/// unwinds gets released, including on early error returns.
impl Drop for DisposableRegistry {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disposal::disposable::DisposeFn;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting_guard(counter: &Arc<AtomicU32>) -> DisposeRef {
        let counter = Arc::clone(counter);
        DisposeFn::arc(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_disposes_each_member_exactly_once() {
        let released = Arc::new(AtomicU32::new(0));
        let registry = DisposableRegistry::new();
        for _ in 0..5 {
            registry.add(counting_guard(&released));
        }

        registry.dispose();
        assert_eq!(released.load(Ordering::SeqCst), 5);
        assert!(registry.is_empty());

        registry.dispose();
        assert_eq!(released.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_dispose_on_empty_registry_is_safe() {
        let registry = DisposableRegistry::new();
        registry.dispose();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_members_released_in_insertion_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let registry = DisposableRegistry::new();
        for i in 0..3 {
            let order = Arc::clone(&order);
            registry.defer(move || order.lock().unwrap().push(i));
        }
        registry.dispose();
        assert_eq!(order.lock().unwrap().as_slice(), [0, 1, 2]);
    }

    #[test]
    fn test_member_added_after_dispose_joins_next_drain() {
        let released = Arc::new(AtomicU32::new(0));
        let registry = DisposableRegistry::new();
        registry.add(counting_guard(&released));
        registry.dispose();
        assert_eq!(released.load(Ordering::SeqCst), 1);

        registry.add(counting_guard(&released));
        assert_eq!(registry.len(), 1);
        registry.dispose();
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_guard_releases_remaining_members() {
        let released = Arc::new(AtomicU32::new(0));
        {
            let registry = DisposableRegistry::new();
            registry.add(counting_guard(&released));
            registry.add(counting_guard(&released));
            // Scope ends without an explicit dispose.
        }
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_holds_observables_directly() {
        let torn_down = Arc::new(AtomicU32::new(0));
        let torn_down2 = Arc::clone(&torn_down);
        let stream: crate::tasks::ObservableTask<u32, String> = crate::tasks::ObservableTask::new(
            move || {
                torn_down2.fetch_add(1, Ordering::SeqCst);
            },
            |_| {},
        );

        let registry = DisposableRegistry::new();
        registry.add(Arc::new(stream.clone()));
        registry.dispose();

        assert!(!stream.is_active());
        assert_eq!(torn_down.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tolerates_already_disposed_members() {
        let released = Arc::new(AtomicU32::new(0));
        let registry = DisposableRegistry::new();
        let guard = counting_guard(&released);
        guard.dispose();
        registry.add(guard);
        registry.dispose();
        // The member's own idempotence holds; no double release.
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
