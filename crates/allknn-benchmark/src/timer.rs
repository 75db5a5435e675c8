//! Scoped wall-clock timer.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Measures the wall-clock time of one scoped region.
///
/// [`Timer::start`] returns a guard; the measurement stops when the guard is
/// dropped, so early returns and unwinding still record a stop time. A timer
/// measures once: starting it again keeps the original start instant.
///
/// # Example
///
/// ```
/// use allknn_benchmark::Timer;
///
/// let timer = Timer::new();
/// {
///     let _scope = timer.start();
///     std::thread::sleep(std::time::Duration::from_millis(5));
/// }
/// assert!(timer.elapsed() >= 0.005);
/// ```
#[derive(Debug, Default)]
pub struct Timer {
    started: Cell<Option<Instant>>,
    measured: Cell<Option<Duration>>,
}

impl Timer {
    /// Creates an unstarted timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the measurement and returns the guard that stops it.
    pub fn start(&self) -> TimerScope<'_> {
        if self.started.get().is_none() {
            self.started.set(Some(Instant::now()));
        }
        TimerScope { timer: self }
    }

    /// Returns the measured duration, or `None` until a scope has closed.
    pub fn duration(&self) -> Option<Duration> {
        self.measured.get()
    }

    /// Returns the measured seconds; `0.0` until a scope has closed.
    pub fn elapsed(&self) -> f64 {
        self.duration().map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }

    fn stop(&self) {
        if self.measured.get().is_some() {
            return;
        }
        if let Some(started) = self.started.get() {
            self.measured.set(Some(started.elapsed()));
        }
    }
}

/// Guard returned by [`Timer::start`]; stops the timer on drop.
#[must_use = "the timer stops as soon as the scope guard is dropped"]
#[derive(Debug)]
pub struct TimerScope<'a> {
    timer: &'a Timer,
}

impl Drop for TimerScope<'_> {
    fn drop(&mut self) {
        self.timer.stop();
    }
}
