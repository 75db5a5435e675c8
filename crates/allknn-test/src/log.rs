//! Recording log sink.

use std::sync::Mutex;

use allknn_core::LogSink;

/// Log sink that keeps every message for later assertions.
///
/// Info messages are recorded only when `verbose` is true, matching what a
/// real sink would emit.
///
/// # Example
///
/// ```
/// use allknn_core::LogSink;
/// use allknn_test::RecordingLog;
///
/// let log = RecordingLog::new();
/// log.info("Loading dataset", true);
/// log.info("hidden", false);
/// log.fatal("Invalid k: 0; must be greater than 0 and less or equal than N.");
///
/// assert_eq!(log.infos(), vec!["Loading dataset"]);
/// assert!(log.fatals()[0].starts_with("Invalid k"));
/// ```
#[derive(Debug, Default)]
pub struct RecordingLog {
    infos: Mutex<Vec<String>>,
    fatals: Mutex<Vec<String>>,
}

impl RecordingLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded Info messages.
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Returns the recorded Fatal messages.
    pub fn fatals(&self) -> Vec<String> {
        self.fatals.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Returns true if any Fatal message contains `needle`.
    pub fn has_fatal(&self, needle: &str) -> bool {
        self.fatals().iter().any(|m| m.contains(needle))
    }
}

impl LogSink for RecordingLog {
    fn info(&self, message: &str, verbose: bool) {
        if verbose {
            if let Ok(mut infos) = self.infos.lock() {
                infos.push(message.to_string());
            }
        }
    }

    fn fatal(&self, message: &str) {
        if let Ok(mut fatals) = self.fatals.lock() {
            fatals.push(message.to_string());
        }
    }
}
