//! Data-access abstraction over backing-store locations.
//!
//! - [`Snapshot`] / [`FromSnapshot`] - raw records and fail-fast mapping
//! - [`Location`] - the platform read/listen seam
//! - [`Source`] / [`StoreSource`] - one-shot and continuous entity views

mod location;
mod snapshot;
mod source;

pub use location::{ListenDelivery, ListenerGuard, Location, ReadDelivery};
pub use snapshot::{FromSnapshot, Snapshot};
pub use source::{Source, StoreSource};
