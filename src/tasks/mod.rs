//! Core reactive primitives.
//!
//! - [`Settlable`] - atomic exactly-once settlement cell
//! - [`Task`] / [`TaskCompleter`] - one-shot computation with progress
//! - [`ObservableTask`] / [`ObservableEmitter`] - continuous stream with
//!   explicit unsubscribe/teardown
//! - [`EventStream`] - async `futures::Stream` bridge over an observable

mod observable;
mod settle;
mod task;

pub use observable::{EventStream, ObservableEmitter, ObservableTask};
pub use settle::{SettlePhase, Settlable};
pub use task::{Task, TaskCompleter};
