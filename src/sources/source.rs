//! Data-access abstraction over one backing location.
//!
//! [`Source`] exposes the two views every consumer needs: a one-shot read
//! (`get`, a [`Task`]) and a live subscription (`subscribe`, an
//! [`ObservableTask`]). [`StoreSource`] is the concrete bridge from a
//! [`Location`] to those views.
//!
//! ## Architecture
//! ```text
//! StoreSource<Entity, L>
//!     ├─ get() ───────► L::read ──map──► Task<Entity, TaskError>
//!     ├─ subscribe() ─► L::listen ─map─► ObservableTask<Entity, TaskError>
//!     └─ unsubscribe() ─► ListenerGuard.dispose()   (take-once slot)
//! ```
//!
//! ## Rules
//! - `get()` on an absent location fails with
//!   [`TaskError::NotFound`]: `"{path} doesn't exist"`.
//! - Mapping failures surface as [`TaskError::Validation`]; transport failures
//!   pass through as delivered by the store.
//! - The listener handle lives in a take-once slot: concurrent
//!   subscribe/unsubscribe cannot double-register or double-release the
//!   backing registration. A second `subscribe()` detaches the previous
//!   listener before attaching the new one.
//! - `unsubscribe()` is idempotent and safe with no listener attached.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use crate::disposal::Dispose;
use crate::error::TaskError;
use crate::tasks::{ObservableTask, Task};

use super::location::{ListenerGuard, Location};
use super::snapshot::FromSnapshot;

/// One-shot and continuous views over a backing location.
pub trait Source<Entity>: Send + Sync {
    /// Performs a single read of the backing location.
    fn get(&self) -> Task<Entity, TaskError>;

    /// Attaches a live listener to the backing location.
    fn subscribe(&self) -> ObservableTask<Entity, TaskError>;

    /// Detaches the listener if one is attached. Idempotent.
    fn unsubscribe(&self);
}

type ListenerSlot = Arc<Mutex<Option<ListenerGuard>>>;

/// Bridge from a [`Location`] to the [`Source`] contract, mapping snapshots
/// into `Entity` values via [`FromSnapshot`].
pub struct StoreSource<Entity, L> {
    location: Arc<L>,
    listener: ListenerSlot,
    _entity: PhantomData<fn() -> Entity>,
}

impl<Entity, L> StoreSource<Entity, L>
where
    L: Location,
{
    /// Creates a source over the given backing location.
    pub fn new(location: L) -> Self {
        Self {
            location: Arc::new(location),
            listener: Arc::new(Mutex::new(None)),
            _entity: PhantomData,
        }
    }

    /// Path of the backing location this source reads.
    pub fn path(&self) -> &str {
        self.location.path()
    }

    /// True while a live listener is attached.
    pub fn is_subscribed(&self) -> bool {
        lock_slot(&self.listener).is_some()
    }
}

impl<Entity, L> Source<Entity> for StoreSource<Entity, L>
where
    Entity: FromSnapshot + Clone + Send + 'static,
    L: Location,
{
    fn get(&self) -> Task<Entity, TaskError> {
        let path = self.location.path().to_string();
        let location = Arc::clone(&self.location);
        Task::new(move |completer| {
            location.read(Box::new(move |result| match result {
                Ok(Some(snapshot)) => match Entity::from_snapshot(&snapshot) {
                    Ok(entity) => {
                        completer.succeed(entity);
                    }
                    Err(err) => {
                        completer.fail(err);
                    }
                },
                Ok(None) => {
                    completer.fail(TaskError::not_found(path));
                }
                Err(err) => {
                    completer.fail(err);
                }
            }));
        })
    }

    fn subscribe(&self) -> ObservableTask<Entity, TaskError> {
        let slot = Arc::clone(&self.listener);
        let location = Arc::clone(&self.location);
        let teardown_slot = Arc::clone(&self.listener);

        ObservableTask::new(
            move || detach(&teardown_slot),
            move |emitter| {
                let guard = location.listen(Box::new(move |result| match result {
                    Ok(snapshot) => match Entity::from_snapshot(&snapshot) {
                        Ok(entity) => emitter.next(entity),
                        Err(err) => emitter.error(err),
                    },
                    Err(err) => emitter.error(err),
                }));

                // Take-once slot: a previous registration is detached rather
                // than silently overwritten and leaked.
                let previous = lock_slot(&slot).replace(guard);
                if let Some(previous) = previous {
                    previous.dispose();
                }
            },
        )
    }

    fn unsubscribe(&self) {
        detach(&self.listener);
    }
}

/// Takes the guard out of the slot (if any) and detaches it. Whoever wins the
/// take performs the single release.
fn detach(slot: &ListenerSlot) {
    let guard = lock_slot(slot).take();
    if let Some(guard) = guard {
        guard.dispose();
    }
}

fn lock_slot(slot: &ListenerSlot) -> std::sync::MutexGuard<'_, Option<ListenerGuard>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
