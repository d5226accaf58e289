//! One-shot asynchronous task with progress and chaining.
//!
//! A [`Task`] produces exactly one success value or one error, with zero or
//! more progress notifications strictly before the terminal event. It never
//! occupies a thread: the producer receives a [`TaskCompleter`] and invokes it
//! from whatever thread eventually has the result (a background I/O thread, a
//! listener callback, or the caller's own thread for already-resolved values).
//!
//! ## Architecture
//! ```text
//! Task::new(producer)                    consumer side:
//!       │                                  .on_progress(..)  0..n times
//!       ▼                                  .on_success(..)   at most once
//!   TaskCompleter ──succeed/fail──► Settlable ──► observers
//!       │                                  .flat_map(..) ──► dependent Task
//!       └─ progress(percent) 0..n
//! ```
//!
//! ## Rules
//! - Only the first `succeed`/`fail` call settles the task; the rest are no-ops.
//! - A producer that never settles leaves the task pending forever. No timeout
//!   is imposed at this layer; compose one externally if needed.
//! - There is no cancellation for a started task. To ignore a result, drop the
//!   handle without attaching observers.
//! - Combinators build new tasks holding read-only forwarding of the upstream
//!   terminal event; no mutable state is shared between chains.
//!
//! ## Example
//! ```
//! use taskstream::Task;
//!
//! let doubled: Task<u32, String> = Task::succeeded(21).map(|v| v * 2);
//! doubled.on_success(|v| assert_eq!(v, 42));
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::tasks::settle::{SettlePhase, Settlable};

/// One-shot asynchronous computation: success `T`, error `E`, optional
/// progress (`0..=100`) along the way.
///
/// Cheap to clone; all clones observe the same settlement.
pub struct Task<T, E> {
    inner: Arc<Settlable<T, E>>,
}

impl<T, E> Clone for Task<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Completion capability handed to a task producer.
///
/// Cloneable so the producer can move it into success and failure callbacks of
/// the underlying primitive independently. Only the first `succeed`/`fail`
/// across all clones has effect.
pub struct TaskCompleter<T, E> {
    inner: Arc<Settlable<T, E>>,
}

impl<T, E> Clone for TaskCompleter<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> TaskCompleter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Settles the task with a success value.
    ///
    /// Returns `true` if this call won the settlement; `false` if the task was
    /// already settled (the value is dropped).
    pub fn succeed(&self, value: T) -> bool {
        self.inner.succeed(value)
    }

    /// Settles the task with an error. Same exactly-once contract as
    /// [`TaskCompleter::succeed`].
    pub fn fail(&self, error: E) -> bool {
        self.inner.fail(error)
    }

    /// Reports intermediate progress (`0..=100` by convention).
    ///
    /// Values are forwarded verbatim: no clamping, no monotonicity enforcement.
    /// Dropped once the task is settled.
    pub fn progress(&self, percent: u8) {
        self.inner.progress(percent);
    }
}

impl<T, E> Task<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a task and hands its completer to the producer.
    ///
    /// The producer may settle synchronously before returning, or move the
    /// completer into any later continuation.
    ///
    /// # Example
    /// ```
    /// use taskstream::Task;
    ///
    /// let task: Task<&str, String> = Task::new(|completer| {
    ///     completer.progress(50);
    ///     completer.succeed("done");
    /// });
    /// task.on_success(|v| assert_eq!(v, "done"));
    /// ```
    pub fn new(producer: impl FnOnce(TaskCompleter<T, E>)) -> Self {
        let task = Self::pending();
        producer(task.completer());
        task
    }

    /// Creates an already-succeeded task.
    pub fn succeeded(value: T) -> Self {
        let task = Self::pending();
        task.inner.succeed(value);
        task
    }

    /// Creates an already-failed task.
    pub fn failed(error: E) -> Self {
        let task = Self::pending();
        task.inner.fail(error);
        task
    }

    /// Registers a success observer; fires exactly once when (or if) the task
    /// settles with success. Returns the task for fluent chaining of further
    /// independent observers.
    pub fn on_success(self, observer: impl FnOnce(T) + Send + 'static) -> Self {
        self.inner.on_success(observer);
        self
    }

    /// Registers an error observer; symmetric to [`Task::on_success`].
    pub fn on_error(self, observer: impl FnOnce(E) + Send + 'static) -> Self {
        self.inner.on_error(observer);
        self
    }

    /// Registers a progress observer, invoked zero or more times strictly
    /// before the terminal event and never afterward.
    pub fn on_progress(self, observer: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.inner.on_progress(observer);
        self
    }

    /// Sequences a dependent asynchronous step after this task's success.
    ///
    /// On success with `v`, runs `transform(v)` and forwards the dependent
    /// task's outcome as the outcome of the composed task. On error, the
    /// transform never runs and the composed task fails with the upstream
    /// error unchanged.
    ///
    /// Progress events do not cross a `flat_map` boundary; attach
    /// [`Task::on_progress`] to the step that produces them.
    pub fn flat_map<R, F>(self, transform: F) -> Task<R, E>
    where
        R: Clone + Send + 'static,
        F: FnOnce(T) -> Task<R, E> + Send + 'static,
    {
        let composed: Task<R, E> = Task::pending();
        let forward = composed.completer();
        let short_circuit = composed.completer();

        self.inner.on_success(move |value| {
            let dependent = transform(value);
            let on_ok = forward.clone();
            dependent.inner.on_success(move |result| {
                on_ok.succeed(result);
            });
            dependent.inner.on_error(move |error| {
                forward.fail(error);
            });
        });
        self.inner.on_error(move |error| {
            short_circuit.fail(error);
        });

        composed
    }

    /// Transforms the success value; errors pass through unchanged.
    pub fn map<R, F>(self, transform: F) -> Task<R, E>
    where
        R: Clone + Send + 'static,
        F: FnOnce(T) -> R + Send + 'static,
    {
        let mapped: Task<R, E> = Task::pending();
        let on_ok = mapped.completer();
        let on_err = mapped.completer();
        self.inner.on_success(move |value| {
            on_ok.succeed(transform(value));
        });
        self.inner.on_error(move |error| {
            on_err.fail(error);
        });
        mapped
    }

    /// Returns the current settlement phase.
    pub fn phase(&self) -> SettlePhase {
        self.inner.phase()
    }

    /// True once the task has settled with either outcome.
    pub fn is_settled(&self) -> bool {
        self.inner.phase() != SettlePhase::Pending
    }

    /// Bridges the task into async code: resolves with the terminal outcome.
    ///
    /// If the producer never settles, the future never resolves, matching the
    /// task's own contract.
    ///
    /// # Example
    /// ```
    /// use taskstream::Task;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let task: Task<u32, String> = Task::succeeded(5);
    /// assert_eq!(task.settled().await, Ok(5));
    /// # }
    /// ```
    pub fn settled(&self) -> impl Future<Output = Result<T, E>> {
        let (tx, rx) = oneshot::channel::<Result<T, E>>();
        let slot = Arc::new(Mutex::new(Some(tx)));
        let on_ok = Arc::clone(&slot);
        self.inner.on_success(move |value| {
            if let Some(tx) = take_sender(&on_ok) {
                let _ = tx.send(Ok(value));
            }
        });
        self.inner.on_error(move |error| {
            if let Some(tx) = take_sender(&slot) {
                let _ = tx.send(Err(error));
            }
        });
        // The sender lives inside the settlable's observer queue, so recv can
        // only fail if the task is dropped while pending; stay pending forever
        // in that case, like the task itself.
        async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => futures::future::pending().await,
            }
        }
    }

    /// Internal: a pending task with no producer attached yet.
    fn pending() -> Self {
        Self {
            inner: Arc::new(Settlable::new()),
        }
    }

    /// Internal: completer over the same settlement cell.
    fn completer(&self) -> TaskCompleter<T, E> {
        TaskCompleter {
            inner: Arc::clone(&self.inner),
        }
    }
}

type SenderSlot<T, E> = Arc<Mutex<Option<oneshot::Sender<Result<T, E>>>>>;

fn take_sender<T, E>(slot: &SenderSlot<T, E>) -> Option<oneshot::Sender<Result<T, E>>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Clone) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let log = Arc::clone(&log);
            move |entry: String| log.lock().unwrap().push(entry)
        };
        (log, sink)
    }

    #[test]
    fn test_success_handler_fires_once_with_value() {
        let count = Arc::new(AtomicU32::new(0));
        let count2 = Arc::clone(&count);
        let error_fired = Arc::new(AtomicBool::new(false));
        let error_fired2 = Arc::clone(&error_fired);

        let task: Task<u32, String> = Task::new(|completer| {
            completer.succeed(42);
            completer.succeed(43);
            completer.fail("late".into());
        });
        task.on_success(move |v| {
            assert_eq!(v, 42);
            count2.fetch_add(1, Ordering::SeqCst);
        })
        .on_error(move |_| error_fired2.store(true, Ordering::SeqCst));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!error_fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_error_handler_fires_once_success_never() {
        let errors = Arc::new(AtomicU32::new(0));
        let errors2 = Arc::clone(&errors);
        let successes = Arc::new(AtomicU32::new(0));
        let successes2 = Arc::clone(&successes);

        let task: Task<u32, String> = Task::failed("boom".into());
        task.on_error(move |e| {
            assert_eq!(e, "boom");
            errors2.fetch_add(1, Ordering::SeqCst);
        })
        .on_success(move |_| {
            successes2.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(successes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_deferred_settlement_reaches_earlier_observer() {
        let seen = Arc::new(AtomicU32::new(0));
        let seen2 = Arc::clone(&seen);

        let mut parked = None;
        let task: Task<u32, String> = Task::new(|completer| parked = Some(completer));
        let task = task.on_success(move |v| seen2.store(v, Ordering::SeqCst));

        assert!(!task.is_settled());
        parked.expect("producer ran").succeed(9);
        assert_eq!(seen.load(Ordering::SeqCst), 9);
        assert_eq!(task.phase(), SettlePhase::Succeeded);
    }

    #[test]
    fn test_progress_strictly_before_terminal() {
        let (log, sink) = recorder();
        let progress_sink = sink.clone();

        let task: Task<&str, String> = Task::new(|completer| {
            completer.progress(0);
            completer.progress(50);
            completer.progress(100);
            completer.succeed("ok");
            completer.progress(100);
        });
        // Observers attached before the producer would see the live order; here
        // the already-settled task must replay only the terminal event.
        task.clone()
            .on_progress(move |p| progress_sink(format!("progress:{p}")))
            .on_success(move |v| sink(format!("success:{v}")));

        assert_eq!(log.lock().unwrap().as_slice(), ["success:ok"]);
    }

    #[test]
    fn test_progress_order_with_live_observer() {
        let (log, sink) = recorder();
        let progress_sink = sink.clone();

        let mut parked = None;
        let task: Task<&str, String> = Task::new(|completer| parked = Some(completer));
        task.on_progress(move |p| progress_sink(format!("progress:{p}")))
            .on_success(move |v| sink(format!("success:{v}")));

        let completer = parked.expect("producer ran");
        completer.progress(0);
        completer.progress(50);
        completer.progress(100);
        completer.succeed("ok");
        completer.progress(100);

        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["progress:0", "progress:50", "progress:100", "success:ok"]
        );
    }

    #[test]
    fn test_settle_with_zero_progress_events_is_legal() {
        let fired = Arc::new(AtomicU32::new(0));
        let fired2 = Arc::clone(&fired);
        let task: Task<u32, String> = Task::succeeded(1);
        task.on_progress(move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_flat_map_forwards_dependent_outcome() {
        let seen = Arc::new(Mutex::new(None));
        let seen2 = Arc::clone(&seen);

        let composed = Task::<u32, String>::succeeded(10)
            .flat_map(|v| Task::succeeded(v * 3))
            .on_success(move |v| *seen2.lock().unwrap() = Some(v));

        assert_eq!(*seen.lock().unwrap(), Some(30));
        assert_eq!(composed.phase(), SettlePhase::Succeeded);
    }

    #[test]
    fn test_flat_map_forwards_dependent_error() {
        let seen = Arc::new(Mutex::new(None));
        let seen2 = Arc::clone(&seen);

        Task::<u32, String>::succeeded(10)
            .flat_map(|_| Task::<u32, String>::failed("inner".into()))
            .on_error(move |e| *seen2.lock().unwrap() = Some(e));

        assert_eq!(seen.lock().unwrap().as_deref(), Some("inner"));
    }

    #[test]
    fn test_flat_map_short_circuits_on_upstream_error() {
        let transform_ran = Arc::new(AtomicBool::new(false));
        let transform_ran2 = Arc::clone(&transform_ran);
        let seen = Arc::new(Mutex::new(None));
        let seen2 = Arc::clone(&seen);

        Task::<u32, String>::failed("upstream".into())
            .flat_map(move |v| {
                transform_ran2.store(true, Ordering::SeqCst);
                Task::succeeded(v)
            })
            .on_error(move |e| *seen2.lock().unwrap() = Some(e));

        assert!(!transform_ran.load(Ordering::SeqCst));
        assert_eq!(seen.lock().unwrap().as_deref(), Some("upstream"));
    }

    #[test]
    fn test_map_transforms_success_and_passes_error() {
        let ok = Arc::new(Mutex::new(None));
        let ok2 = Arc::clone(&ok);
        Task::<u32, String>::succeeded(4)
            .map(|v| v + 1)
            .on_success(move |v| *ok2.lock().unwrap() = Some(v));
        assert_eq!(*ok.lock().unwrap(), Some(5));

        let err = Arc::new(Mutex::new(None));
        let err2 = Arc::clone(&err);
        Task::<u32, String>::failed("nope".into())
            .map(|v| v + 1)
            .on_error(move |e| *err2.lock().unwrap() = Some(e));
        assert_eq!(err.lock().unwrap().as_deref(), Some("nope"));
    }

    #[tokio::test]
    async fn test_settled_resolves_with_outcome() {
        let task: Task<u32, String> = Task::new(|completer| {
            std::thread::spawn(move || {
                completer.succeed(11);
            });
        });
        assert_eq!(task.settled().await, Ok(11));

        let failed: Task<u32, String> = Task::failed("down".into());
        assert_eq!(failed.settled().await, Err("down".into()));
    }
}
