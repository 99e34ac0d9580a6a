//! # Debouncing
//!
//! Delays propagation of a rapidly changing value until it has been stable
//! for a fixed interval. Only the most recent value inside a stability
//! window is ever emitted; intermediate values are dropped, never queued.
//!
//! Two flavours share those semantics:
//!
//! - [`Debounced`] is a plain state cell driven by explicit [`Instant`]s.
//!   It does no I/O and spawns nothing, which makes it suitable for
//!   embedding in synchronous state such as the search engine.
//! - [`Debouncer`] runs the same rule as a background tokio task: a
//!   single-slot `watch` channel in, a timer that resets on every write,
//!   and a `watch` channel out.
//!
//! ```rust,ignore
//! let debouncer = Debouncer::spawn(String::new(), Duration::from_millis(300));
//! let mut settled = debouncer.subscribe();
//! debouncer.push("bos".to_string());
//! settled.changed().await?;
//! ```

use std::time::{Duration, Instant};
use tokio::{sync::watch, task::JoinHandle};

/// Where a debounced value is in its cycle.
///
/// `Idle -> Typing -> Settled -> Idle`, repeating with every new input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Latest input equals the settled value and nothing new was emitted
    Idle,
    /// Latest input differs from the settled value
    Typing,
    /// A new value was emitted by the most recent poll
    Settled,
}

/// Clock-driven debounce cell.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
    fresh: bool,
}

impl<T: Clone + PartialEq> Debounced<T> {
    #[must_use]
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            settled: initial,
            pending: None,
            delay,
            fresh: false,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input at `now`. Any pending update is discarded and the
    /// stability window restarts.
    pub fn set(&mut self, value: T, now: Instant) {
        self.fresh = false;
        self.pending = Some((value, now + self.delay));
    }

    /// Promote the pending value if its window has elapsed by `now`.
    ///
    /// Returns the newly settled value when it changed. A poll that emits
    /// nothing moves a `Settled` cell back to `Idle`.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let due = matches!(&self.pending, Some((_, deadline)) if *deadline <= now);
        if !due {
            self.fresh = false;
            return None;
        }
        self.promote()
    }

    /// Settle the pending value immediately, ignoring the window.
    pub fn flush(&mut self) -> Option<&T> {
        if self.pending.is_none() {
            return None;
        }
        self.promote()
    }

    fn promote(&mut self) -> Option<&T> {
        let (value, _) = self.pending.take()?;
        if value == self.settled {
            self.fresh = false;
            return None;
        }
        self.settled = value;
        self.fresh = true;
        Some(&self.settled)
    }

    /// Replace both the settled and the latest value, cancelling any
    /// pending update.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.fresh = self.settled != value;
        self.settled = value;
    }

    /// The lagging value consumers should compute from.
    #[must_use]
    pub fn settled(&self) -> &T {
        &self.settled
    }

    /// The most recent input, shown to the user immediately.
    #[must_use]
    pub fn latest(&self) -> &T {
        self.pending.as_ref().map_or(&self.settled, |(value, _)| value)
    }

    /// When the pending value will settle, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.latest() != &self.settled
    }

    #[must_use]
    pub fn state(&self) -> DebounceState {
        if self.is_pending() {
            DebounceState::Typing
        } else if self.fresh {
            DebounceState::Settled
        } else {
            DebounceState::Idle
        }
    }
}

/// Background debouncer built on tokio.
///
/// Writes go into a single-slot channel; a task waits until no write has
/// arrived for `delay` and then publishes the latest value. Dropping the
/// debouncer stops the task.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Spawn the debouncing task on the current tokio runtime.
    #[must_use]
    pub fn spawn(initial: T, delay: Duration) -> Self {
        let (input, mut input_rx) = watch::channel(initial.clone());
        let (output_tx, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while input_rx.changed().await.is_ok() {
                // Restart the timer on every write until one full window passes quietly
                loop {
                    tokio::select! {
                        changed = input_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                        () = tokio::time::sleep(delay) => break,
                    }
                }

                let value = input_rx.borrow_and_update().clone();
                output_tx.send_if_modified(|current| {
                    if *current == value {
                        false
                    } else {
                        *current = value;
                        true
                    }
                });
            }
        });

        Self {
            input,
            output,
            task,
        }
    }

    /// Record a new input value.
    pub fn push(&self, value: T) {
        self.input.send_replace(value);
    }

    /// The most recent input.
    #[must_use]
    pub fn latest(&self) -> T {
        self.input.borrow().clone()
    }

    /// The last value that survived a full quiet window.
    #[must_use]
    pub fn settled(&self) -> T {
        self.output.borrow().clone()
    }

    /// Receiver notified each time a new value settles.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
