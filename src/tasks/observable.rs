//! Continuous asynchronous stream bound to an external push source.
//!
//! An [`ObservableTask`] wraps a listener registration: while active it emits
//! any number of `next` values or stream errors; `unsubscribe()` transitions it
//! to disposed and runs the teardown action exactly once. The lifecycle rides
//! on a [`CancellationToken`], so the Active→Disposed edge is an atomic
//! first-cancel-wins even under concurrent unsubscribes.
//!
//! ## Architecture
//! ```text
//! ObservableTask::new(teardown, producer)
//!        │
//!        ▼
//!   ObservableEmitter ──next/error──► observers (on_next / on_error)
//!        │
//!        ▼ unsubscribe() / dispose()
//!   CancellationToken.cancel() ──► teardown() (exactly once)
//! ```
//!
//! ## Rules
//! - `unsubscribe()` called N>1 times runs the teardown exactly once.
//! - An emission racing an unsubscribe may or may not be delivered; it never
//!   crashes, never double-releases the backing resource, never re-runs teardown.
//! - A stream error does NOT dispose the stream. Callers wanting
//!   dispose-on-first-error call `unsubscribe()` from their error observer.
//! - Every subscription must be paired with exactly one disposal: a direct
//!   `unsubscribe()` or registration into a
//!   [`DisposableRegistry`](crate::DisposableRegistry). Dropping the last
//!   handle of a still-active stream leaks the listener and logs a warning.

use std::sync::{Arc, Mutex, PoisonError};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::disposal::Dispose;

type NextFn<T> = Arc<dyn Fn(T) + Send + Sync>;
type ErrorFn<E> = Arc<dyn Fn(E) + Send + Sync>;

struct ObservableInner<T, E> {
    lifecycle: CancellationToken,
    teardown: Mutex<Option<Box<dyn FnOnce() + Send>>>,
    on_next: Mutex<Vec<NextFn<T>>>,
    on_error: Mutex<Vec<ErrorFn<E>>>,
}

impl<T, E> ObservableInner<T, E> {
    /// Active→Disposed: cancel is idempotent, the teardown take is exclusive.
    fn dispose_once(&self) {
        self.lifecycle.cancel();
        let teardown = lock(&self.teardown).take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }
}

impl<T, E> Drop for ObservableInner<T, E> {
    fn drop(&mut self) {
        if !self.lifecycle.is_cancelled() {
            eprintln!("[taskstream] observable dropped while active: listener leaked");
        }
    }
}

/// Continuous asynchronous stream of `T` values or stream errors `E`, with an
/// explicit unsubscribe/teardown lifecycle.
///
/// Cheap to clone; all clones share one lifecycle and one teardown.
pub struct ObservableTask<T, E> {
    inner: Arc<ObservableInner<T, E>>,
}

impl<T, E> Clone for ObservableTask<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Emission capability handed to an observable producer.
///
/// Wire `next`/`error` to the external push source (e.g. a change listener).
/// Holds the stream alive for as long as the backing registration holds the
/// emitter.
pub struct ObservableEmitter<T, E> {
    inner: Arc<ObservableInner<T, E>>,
}

impl<T, E> ObservableEmitter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Emits the next stream value. Dropped once the stream is disposed.
    pub fn next(&self, value: T) {
        if self.inner.lifecycle.is_cancelled() {
            return;
        }
        let observers = lock(&self.inner.on_next).clone();
        for observer in observers {
            observer(value.clone());
        }
    }

    /// Emits a stream error. Does not dispose the stream; the backing source
    /// may keep delivering afterward unless the consumer unsubscribes.
    pub fn error(&self, error: E) {
        if self.inner.lifecycle.is_cancelled() {
            return;
        }
        let observers = lock(&self.inner.on_error).clone();
        for observer in observers {
            observer(error.clone());
        }
    }

    /// True while the stream has not been disposed.
    pub fn is_active(&self) -> bool {
        !self.inner.lifecycle.is_cancelled()
    }
}

impl<T, E> ObservableTask<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an observable, wiring the producer to an
    /// [`ObservableEmitter`].
    ///
    /// `teardown` runs exactly once on the Active→Disposed transition,
    /// typically detaching the backing listener registration.
    ///
    /// # Example
    /// ```
    /// use taskstream::ObservableTask;
    ///
    /// let stream: ObservableTask<u32, String> = ObservableTask::new(
    ///     || { /* detach listener */ },
    ///     |emitter| {
    ///         emitter.next(1);
    ///         emitter.next(2);
    ///     },
    /// );
    /// stream.unsubscribe();
    /// ```
    pub fn new(
        teardown: impl FnOnce() + Send + 'static,
        producer: impl FnOnce(ObservableEmitter<T, E>),
    ) -> Self {
        let inner = Arc::new(ObservableInner {
            lifecycle: CancellationToken::new(),
            teardown: Mutex::new(Some(Box::new(teardown))),
            on_next: Mutex::new(Vec::new()),
            on_error: Mutex::new(Vec::new()),
        });
        producer(ObservableEmitter {
            inner: Arc::clone(&inner),
        });
        Self { inner }
    }

    /// Registers a value observer, invoked for every emission while active.
    /// Returns the stream for fluent chaining.
    pub fn on_next(self, observer: impl Fn(T) + Send + Sync + 'static) -> Self {
        lock(&self.inner.on_next).push(Arc::new(observer));
        self
    }

    /// Registers a stream-error observer, invoked for every error emission.
    pub fn on_error(self, observer: impl Fn(E) + Send + Sync + 'static) -> Self {
        lock(&self.inner.on_error).push(Arc::new(observer));
        self
    }

    /// Transitions Active→Disposed and runs the teardown action.
    ///
    /// Idempotent: any number of calls (from any number of clones, on any
    /// threads) runs the teardown exactly once.
    pub fn unsubscribe(&self) {
        self.inner.dispose_once();
    }

    /// True while the stream has not been disposed.
    pub fn is_active(&self) -> bool {
        !self.inner.lifecycle.is_cancelled()
    }

    /// Bridges the stream into async code as a `futures::Stream` of
    /// `Result<T, E>` items.
    ///
    /// The stream yields `Ok` per emission, yields one `Err` for a stream
    /// error and then terminates. Dropping the returned stream unsubscribes
    /// the observable (RAII disposal).
    pub fn into_stream(self) -> EventStream<T, E> {
        let (tx, rx) = mpsc::unbounded_channel::<Result<T, E>>();
        let tx_err = tx.clone();
        let this = self
            .on_next(move |value| {
                let _ = tx.send(Ok(value));
            })
            .on_error(move |error| {
                let _ = tx_err.send(Err(error));
            });
        EventStream {
            rx,
            handle: this,
            done: false,
        }
    }
}

/// Every observable is directly [`Dispose`], so it can be stored in a
/// [`DisposableRegistry`](crate::DisposableRegistry) as-is.
impl<T, E> Dispose for ObservableTask<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn dispose(&self) {
        self.inner.dispose_once();
    }
}

/// Async adapter over an [`ObservableTask`]: `Ok(next)` items until an
/// `Err(stream error)` item, then end-of-stream.
///
/// Unsubscribes the underlying observable when dropped.
pub struct EventStream<T, E> {
    rx: mpsc::UnboundedReceiver<Result<T, E>>,
    handle: ObservableTask<T, E>,
    done: bool,
}

impl<T, E> Stream for EventStream<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Item = Result<T, E>;

    fn poll_next(
        self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return std::task::Poll::Ready(None);
        }
        match this.rx.poll_recv(cx) {
            std::task::Poll::Ready(Some(Err(error))) => {
                this.done = true;
                std::task::Poll::Ready(Some(Err(error)))
            }
            other => other,
        }
    }
}

impl<T, E> Drop for EventStream<T, E> {
    fn drop(&mut self) {
        self.handle.inner.dispose_once();
    }
}

/// Poison-tolerant lock: a panicking observer must not wedge the stream.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
