//! Backing-store seam: the platform-specific read/listen mechanism.
//!
//! [`Location`] is the boundary to whatever concrete store sits underneath
//! (a document database, a key-value service, an in-memory fake in tests).
//! It stays callback-driven on purpose: the store delivers results from its
//! own threads and this crate never blocks waiting for them.
//!
//! The crate only consumes this trait; implementing it is the collaborator's
//! job.

use crate::disposal::DisposeRef;
use crate::error::TaskError;

use super::snapshot::Snapshot;

/// One-shot read delivery: `Ok(Some(..))` record found, `Ok(None)` location
/// absent, `Err(..)` transport failure.
pub type ReadDelivery = Box<dyn FnOnce(Result<Option<Snapshot>, TaskError>) + Send>;

/// Live-listener delivery: one call per backing change, or a transport error.
pub type ListenDelivery = Box<dyn Fn(Result<Snapshot, TaskError>) + Send + Sync>;

/// Handle to an attached listener registration; disposing detaches it.
pub type ListenerGuard = DisposeRef;

/// One addressable location in a backing store.
pub trait Location: Send + Sync + 'static {
    /// Stable path/identifier of this location, used in error descriptions.
    fn path(&self) -> &str;

    /// Performs a single read, delivering the result at most once from
    /// whatever thread the store uses.
    fn read(&self, deliver: ReadDelivery);

    /// Attaches a live listener; every backing change produces a delivery with
    /// the latest snapshot. Returns the registration guard; disposing it
    /// detaches the listener.
    fn listen(&self, deliver: ListenDelivery) -> ListenerGuard;
}
