//! Atomic terminal-state primitive underlying [`Task`](crate::Task).
//!
//! [`Settlable`] holds the outcome of a one-shot computation and the observers
//! waiting for it. The phase lives in an `AtomicU8` and moves one way:
//!
//! ```text
//! Pending ──compare_exchange──► Settling ──► Succeeded
//!                                       └──► Failed
//! ```
//!
//! ## Rules
//! - Exactly one settle attempt wins the compare-and-swap; every later attempt
//!   (including the other variant) is a no-op returning `false`.
//! - Terminal observers are `FnOnce`, stored until settlement and drained by the
//!   settling thread; each fires exactly once with its own clone of the outcome.
//! - Observers attached after settlement fire immediately with the stored outcome.
//! - Progress notifications are forwarded only while pending; progress after
//!   settlement is dropped. Values pass through verbatim: no range clamping and
//!   no monotonicity enforcement.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

const PENDING: u8 = 0;
const SETTLING: u8 = 1;
const SUCCEEDED: u8 = 2;
const FAILED: u8 = 3;

type TerminalFn<V> = Box<dyn FnOnce(V) + Send>;
type ProgressFn = dyn Fn(u8) + Send + Sync;

/// Observable phase of a [`Settlable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePhase {
    /// No terminal event yet; the producer still owes a settlement (or never
    /// delivers one, which is legal).
    Pending,
    /// Settled with a success value.
    Succeeded,
    /// Settled with an error.
    Failed,
}

/// Pending-side state: stored outcome plus waiting observers.
struct Waiting<T, E> {
    outcome: Option<Result<T, E>>,
    on_success: Vec<TerminalFn<T>>,
    on_error: Vec<TerminalFn<E>>,
    on_progress: Vec<std::sync::Arc<ProgressFn>>,
}

/// One-shot settlement cell with exactly-once semantics.
///
/// The settle path is a two-step protocol: win the phase CAS first, then store
/// the outcome and drain observers under the lock. Observer registration reads
/// the outcome under the same lock, so a late registration either sees the
/// stored outcome (and fires immediately) or lands in the queue before the
/// drain. There is no window in between.
pub struct Settlable<T, E> {
    phase: AtomicU8,
    waiting: Mutex<Waiting<T, E>>,
}

impl<T, E> Settlable<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a pending cell with no observers.
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(PENDING),
            waiting: Mutex::new(Waiting {
                outcome: None,
                on_success: Vec::new(),
                on_error: Vec::new(),
                on_progress: Vec::new(),
            }),
        }
    }

    /// Returns the current phase. `Settling` is reported as `Pending`; it is an
    /// internal instant, not an observable state.
    pub fn phase(&self) -> SettlePhase {
        match self.phase.load(Ordering::Acquire) {
            SUCCEEDED => SettlePhase::Succeeded,
            FAILED => SettlePhase::Failed,
            _ => SettlePhase::Pending,
        }
    }

    /// Attempts the Pending→Succeeded transition.
    ///
    /// Returns `true` for the single winning call; `false` if the cell was
    /// already settled (either variant).
    pub fn succeed(&self, value: T) -> bool {
        if !self.win_settle() {
            return false;
        }
        let drained = {
            let mut waiting = lock(&self.waiting);
            waiting.outcome = Some(Ok(value.clone()));
            waiting.on_error.clear();
            waiting.on_progress.clear();
            std::mem::take(&mut waiting.on_success)
        };
        self.phase.store(SUCCEEDED, Ordering::Release);
        for observer in drained {
            observer(value.clone());
        }
        true
    }

    /// Attempts the Pending→Failed transition. Same exactly-once contract as
    /// [`Settlable::succeed`].
    pub fn fail(&self, error: E) -> bool {
        if !self.win_settle() {
            return false;
        }
        let drained = {
            let mut waiting = lock(&self.waiting);
            waiting.outcome = Some(Err(error.clone()));
            waiting.on_success.clear();
            waiting.on_progress.clear();
            std::mem::take(&mut waiting.on_error)
        };
        self.phase.store(FAILED, Ordering::Release);
        for observer in drained {
            observer(error.clone());
        }
        true
    }

    /// Forwards a progress notification to every progress observer.
    ///
    /// A no-op once the cell is settled. A progress call racing a settle on
    /// another thread may still be delivered while the terminal event is in
    /// flight; callers must tolerate that interleaving.
    pub fn progress(&self, percent: u8) {
        if self.phase.load(Ordering::Acquire) != PENDING {
            return;
        }
        let observers = {
            let waiting = lock(&self.waiting);
            if waiting.outcome.is_some() {
                return;
            }
            waiting.on_progress.clone()
        };
        for observer in observers {
            observer(percent);
        }
    }

    /// Registers a success observer: fires exactly once on success settlement,
    /// never on failure. Fires immediately if already succeeded.
    pub fn on_success(&self, observer: impl FnOnce(T) + Send + 'static) {
        let immediate = {
            let mut guard = lock(&self.waiting);
            let waiting = &mut *guard;
            match &waiting.outcome {
                None => {
                    waiting.on_success.push(Box::new(observer));
                    return;
                }
                Some(Ok(value)) => Some(value.clone()),
                Some(Err(_)) => None,
            }
        };
        if let Some(value) = immediate {
            observer(value);
        }
    }

    /// Registers an error observer: fires exactly once on failure settlement,
    /// never on success. Fires immediately if already failed.
    pub fn on_error(&self, observer: impl FnOnce(E) + Send + 'static) {
        let immediate = {
            let mut guard = lock(&self.waiting);
            let waiting = &mut *guard;
            match &waiting.outcome {
                None => {
                    waiting.on_error.push(Box::new(observer));
                    return;
                }
                Some(Err(error)) => Some(error.clone()),
                Some(Ok(_)) => None,
            }
        };
        if let Some(error) = immediate {
            observer(error);
        }
    }

    /// Registers a progress observer. Dropped silently if the cell is already
    /// settled (no further progress can arrive).
    pub fn on_progress(&self, observer: impl Fn(u8) + Send + Sync + 'static) {
        let mut waiting = lock(&self.waiting);
        if waiting.outcome.is_none() {
            waiting.on_progress.push(std::sync::Arc::new(observer));
        }
    }

    /// Wins or loses the settle race via CAS on the phase byte.
    fn win_settle(&self) -> bool {
        self.phase
            .compare_exchange(PENDING, SETTLING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl<T, E> Default for Settlable<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Poison-tolerant lock: a panicking observer must not wedge the cell.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_first_settle_wins_second_is_noop() {
        let cell: Settlable<u32, String> = Settlable::new();
        assert!(cell.succeed(1));
        assert!(!cell.succeed(2));
        assert!(!cell.fail("late".into()));
        assert_eq!(cell.phase(), SettlePhase::Succeeded);
    }

    #[test]
    fn test_fail_blocks_later_success() {
        let cell: Settlable<u32, String> = Settlable::new();
        assert!(cell.fail("boom".into()));
        assert!(!cell.succeed(1));
        assert_eq!(cell.phase(), SettlePhase::Failed);
    }

    #[test]
    fn test_observer_attached_after_settlement_fires_immediately() {
        let cell: Settlable<u32, String> = Settlable::new();
        cell.succeed(7);

        let seen = Arc::new(AtomicU32::new(0));
        let seen2 = Arc::clone(&seen);
        cell.on_success(move |v| seen2.store(v, Ordering::SeqCst));
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_wrong_variant_observer_never_fires() {
        let cell: Settlable<u32, String> = Settlable::new();
        let fired = Arc::new(AtomicU32::new(0));
        let fired2 = Arc::clone(&fired);
        cell.on_error(move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        });
        cell.succeed(1);
        // Late error observer against a succeeded cell is dropped too.
        let fired3 = Arc::clone(&fired);
        cell.on_error(move |_| {
            fired3.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_progress_after_settlement_is_dropped() {
        let cell: Settlable<u32, String> = Settlable::new();
        let count = Arc::new(AtomicU32::new(0));
        let count2 = Arc::clone(&count);
        cell.on_progress(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        cell.progress(10);
        cell.succeed(1);
        cell.progress(90);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_settle_exactly_one_winner() {
        let cell: Arc<Settlable<usize, String>> = Arc::new(Settlable::new());
        let wins = Arc::new(AtomicU32::new(0));
        let delivered = Arc::new(AtomicU32::new(0));

        let delivered2 = Arc::clone(&delivered);
        cell.on_success(move |_| {
            delivered2.fetch_add(1, Ordering::SeqCst);
        });
        let delivered3 = Arc::clone(&delivered);
        cell.on_error(move |_| {
            delivered3.fetch_add(1, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cell = Arc::clone(&cell);
                let wins = Arc::clone(&wins);
                std::thread::spawn(move || {
                    let won = if i % 2 == 0 {
                        cell.succeed(i)
                    } else {
                        cell.fail(format!("err-{i}"))
                    };
                    if won {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("settler thread panicked");
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }
}
