//! Resource disposal: the [`Dispose`] capability and the lifecycle-scoped
//! [`DisposableRegistry`].
//!
//! - [`Dispose`] / [`DisposeRef`] - idempotent release of a held resource
//! - [`DisposeFn`] - function-backed disposable
//! - [`DisposableRegistry`] - ordered collection released once at teardown

mod disposable;
mod registry;

pub use disposable::{Dispose, DisposeFn, DisposeRef};
pub use registry::DisposableRegistry;
