//! Deadline-bounded execution on a worker thread.

use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use tracing::debug;

/// Single-use slot through which a unit of work publishes its result.
///
/// Publishing consumes the slot, so a worker can produce at most one value.
/// Dropping the slot without publishing tells the runner the work ended
/// without a result.
#[derive(Debug)]
pub struct ResultSlot<T> {
    sender: Sender<T>,
}

impl<T> ResultSlot<T> {
    /// Publishes the result.
    ///
    /// Returns `false` if nobody is waiting any more (the run timed out).
    pub fn publish(self, value: T) -> bool {
        self.sender.send(value).is_ok()
    }
}

/// How a unit of work under [`TimeoutRunner`] ended, from the caller's view.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    /// The work published a value before the deadline.
    Completed(T),
    /// The deadline passed first; the worker was left running.
    TimedOut,
    /// The work ended (or never started) without publishing.
    Dropped,
}

/// Runs a unit of work on its own thread and waits for it with a deadline.
///
/// Cancellation is best effort. When the deadline passes the runner stops
/// waiting and reports [`Completion::TimedOut`], but the worker thread is
/// detached rather than killed; it keeps running until the work returns,
/// and any logging it does still happens. Its late result goes to a
/// channel that belongs to the abandoned run only.
///
/// # Example
///
/// ```
/// use allknn_benchmark::{Completion, TimeoutRunner};
/// use std::time::Duration;
///
/// let runner = TimeoutRunner::new(Some(Duration::from_secs(5)));
/// let completion = runner.run(|slot| {
///     slot.publish(6 * 7);
/// });
/// assert_eq!(completion, Completion::Completed(42));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutRunner {
    timeout: Option<Duration>,
}

impl TimeoutRunner {
    /// Creates a runner. `None` waits for as long as the work takes.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Creates a runner from whole seconds; `0` waits without a deadline.
    pub fn from_secs(seconds: u64) -> Self {
        Self::new((seconds > 0).then(|| Duration::from_secs(seconds)))
    }

    /// Returns the deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Runs `work` on a fresh worker thread and waits for its result.
    pub fn run<T, F>(&self, work: F) -> Completion<T>
    where
        T: Send + 'static,
        F: FnOnce(ResultSlot<T>) + Send + 'static,
    {
        let (sender, receiver) = channel::bounded(1);
        let slot = ResultSlot { sender };

        let handle = match thread::Builder::new()
            .name("allknn-worker".to_string())
            .spawn(move || work(slot))
        {
            Ok(handle) => handle,
            Err(err) => {
                debug!(error = %err, "failed to spawn benchmark worker");
                return Completion::Dropped;
            }
        };

        let completion = self.wait(&receiver);
        match completion {
            Completion::TimedOut => {
                debug!(timeout = ?self.timeout, "abandoning benchmark worker");
            }
            _ => {
                // The worker has published or exited; reap it.
                if handle.join().is_err() {
                    debug!("benchmark worker panicked");
                }
            }
        }
        completion
    }

    fn wait<T>(&self, receiver: &Receiver<T>) -> Completion<T> {
        match self.timeout {
            None => receiver
                .recv()
                .map(Completion::Completed)
                .unwrap_or(Completion::Dropped),
            Some(timeout) => match receiver.recv_timeout(timeout) {
                Ok(value) => Completion::Completed(value),
                Err(RecvTimeoutError::Timeout) => Completion::TimedOut,
                Err(RecvTimeoutError::Disconnected) => Completion::Dropped,
            },
        }
    }
}
