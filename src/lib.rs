//! # taskstream
//!
//! **Taskstream** is a minimal reactive async-primitives library for Rust.
//!
//! It provides one uniform, composable way to express "eventually one result
//! or an error" ([`Task`]) and "zero or more values over time until told to
//! stop" ([`ObservableTask`]), with safe resource teardown and chainable
//! transformations across asynchronous steps. It is designed as the core every
//! asynchronous boundary of a callback-driven application routes through:
//! network requests, upload progress, live data-subscription listeners.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐        ┌───────────────────┐
//!     │  Settlable   │        │ CancellationToken │
//!     │ (CAS settle) │        │ (Active→Disposed) │
//!     └──────┬───────┘        └─────────┬─────────┘
//!            ▼                          ▼
//!     ┌──────────────┐        ┌──────────────────┐      ┌────────────────────┐
//!     │  Task<T,E>   │        │ ObservableTask   │──────│ Dispose /          │
//!     │  one-shot    │        │ <T,E> continuous │      │ DisposableRegistry │
//!     └──────┬───────┘        └─────────┬────────┘      └────────────────────┘
//!            │  on_success / on_error   │  on_next / on_error
//!            │  on_progress / flat_map  │  unsubscribe / into_stream
//!            ▼                          ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source<Entity>  (StoreSource over a Location)                          │
//! │  - get()        ─► Task<Entity, TaskError>                              │
//! │  - subscribe()  ─► ObservableTask<Entity, TaskError>                    │
//! │  - unsubscribe()─► take-once listener slot                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//!            ▲
//!            │ injected clients (no global state)
//! ┌──────────┴───────────┐   ┌──────────────────────┐
//! │ MediaClient          │   │ MessageClient        │
//! │ upload_url/upload_image   │ send_message         │
//! └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Task:        Pending ──settle──► Succeeded | Failed        (one-way, CAS)
//!              progress 0..n strictly before the terminal event
//!
//! Observable:  Active ──unsubscribe──► Disposed              (teardown once)
//!              next 0..n, stream errors do not dispose
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types                                  |
//! |-----------------|----------------------------------------------------------|--------------------------------------------|
//! | **One-shot**    | Exactly-once settlement, progress, chaining.             | [`Task`], [`TaskCompleter`], [`Settlable`] |
//! | **Streams**     | Push emissions with explicit teardown, async bridge.     | [`ObservableTask`], [`EventStream`]        |
//! | **Disposal**    | Idempotent release, lifecycle-scoped collection.         | [`Dispose`], [`DisposableRegistry`]        |
//! | **Sources**     | One-shot + live views over a backing location.           | [`Source`], [`StoreSource`], [`Snapshot`]  |
//! | **Clients**     | Upload/messaging seams and the composed upload chain.    | [`MediaClient`], [`MessageClient`]         |
//! | **Errors**      | Typed taxonomy crossing every task boundary.             | [`TaskError`]                              |
//!
//! ## Example
//! ```rust
//! use taskstream::{DisposableRegistry, Task};
//!
//! // Chain two dependent async steps; the second never runs on failure.
//! let chain: Task<String, String> = Task::succeeded(7)
//!     .flat_map(|n| Task::succeeded(format!("value-{n}")));
//! chain.on_success(|v| assert_eq!(v, "value-7"));
//!
//! // Lifecycle scope: everything registered is released exactly once.
//! let registry = DisposableRegistry::new();
//! registry.defer(|| { /* detach a listener */ });
//! registry.dispose();
//! ```
//!
//! ## Guarantees and non-guarantees
//! - Within one task: progress before terminal, exactly one terminal event.
//! - Within one observable: emissions in backing-source order.
//! - Across independent tasks/observables: no ordering guarantees.
//! - No retries, no timeouts, no cancellation of a started one-shot task;
//!   those are caller concerns composed on top.

mod clients;
mod disposal;
mod error;
mod sources;
mod tasks;

// ---- Public re-exports ----

pub use clients::{send_image, DownloadUrl, MediaClient, MessageClient, MessageId, MessageInput};
pub use disposal::{DisposableRegistry, Dispose, DisposeFn, DisposeRef};
pub use error::TaskError;
pub use sources::{
    FromSnapshot, ListenDelivery, ListenerGuard, Location, ReadDelivery, Snapshot, Source,
    StoreSource,
};
pub use tasks::{
    EventStream, ObservableEmitter, ObservableTask, SettlePhase, Settlable, Task, TaskCompleter,
};
