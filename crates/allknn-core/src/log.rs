//! Logging collaborator.

use std::sync::Arc;

/// Write-only sink for harness progress and failures.
///
/// The runner receives a sink at construction instead of reaching for a
/// global logger, so tests can capture exactly what a run reported.
pub trait LogSink: Send + Sync {
    /// Reports progress. Implementations drop the message when `verbose` is
    /// false.
    fn info(&self, message: &str, verbose: bool);

    /// Reports an unrecoverable validation, dataset, or library error.
    fn fatal(&self, message: &str);
}

impl<L: LogSink + ?Sized> LogSink for Arc<L> {
    fn info(&self, message: &str, verbose: bool) {
        (**self).info(message, verbose);
    }

    fn fatal(&self, message: &str) {
        (**self).fatal(message);
    }
}

impl<L: LogSink + ?Sized> LogSink for &L {
    fn info(&self, message: &str, verbose: bool) {
        (**self).info(message, verbose);
    }

    fn fatal(&self, message: &str) {
        (**self).fatal(message);
    }
}
