//! `tracing`-backed log sink.

use tracing::{error, info};

use allknn_core::LogSink;

/// Default [`LogSink`]: forwards harness messages as `tracing` events.
///
/// Info messages become `INFO` events with `event = "info"`; Fatal messages
/// become `ERROR` events with `event = "fatal"`. Install a subscriber (for
/// example `allknn_console::init`) to see them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn info(&self, message: &str, verbose: bool) {
        if verbose {
            info!(event = "info", message);
        }
    }

    fn fatal(&self, message: &str) {
        error!(event = "fatal", message);
    }
}
