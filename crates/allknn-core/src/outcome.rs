//! Run outcomes and the caller-facing metrics contract.

use serde::{Deserialize, Serialize};

/// Sentinel reported when a run failed (validation, dataset, or library).
pub const FAILURE_SENTINEL: f64 = -1.0;

/// Sentinel reported when a run did not finish before its timeout.
pub const TIMEOUT_SENTINEL: f64 = -2.0;

/// Result of a single benchmark run, produced exactly once per invocation.
///
/// # Example
///
/// ```
/// use allknn_core::RunOutcome;
///
/// assert_eq!(RunOutcome::Elapsed(0.25).sentinel(), 0.25);
/// assert_eq!(RunOutcome::Failed.sentinel(), -1.0);
/// assert!(RunOutcome::TimedOut.sentinel() < 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// The timed region completed; wall-clock seconds.
    Elapsed(f64),
    /// The run failed before or during the search.
    Failed,
    /// The run was abandoned at its deadline.
    TimedOut,
}

impl RunOutcome {
    /// Returns the elapsed seconds, or the negative sentinel for failures.
    pub fn sentinel(&self) -> f64 {
        match self {
            Self::Elapsed(seconds) => *seconds,
            Self::Failed => FAILURE_SENTINEL,
            Self::TimedOut => TIMEOUT_SENTINEL,
        }
    }

    /// Classifies a raw sentinel value.
    ///
    /// Non-negative values are elapsed seconds; [`TIMEOUT_SENTINEL`] is a
    /// timeout; any other negative (or NaN) value is a failure.
    pub fn from_sentinel(value: f64) -> Self {
        if value >= 0.0 {
            Self::Elapsed(value)
        } else if value == TIMEOUT_SENTINEL {
            Self::TimedOut
        } else {
            Self::Failed
        }
    }

    /// Returns true if the run produced a timing.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Elapsed(_))
    }
}

/// Metrics reported by a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Metrics {
    /// Wall-clock seconds spent in the timed region.
    #[serde(rename = "Runtime")]
    pub runtime: f64,
}

/// Caller-facing result of `run_metrics`.
///
/// Serializes untagged, as either `{"Runtime": <seconds>}` or a bare
/// negative number, so callers branch on the shape (or sign) rather than on
/// an error type.
///
/// # Example
///
/// ```
/// use allknn_core::{RunMetrics, RunOutcome};
///
/// let ok = RunMetrics::from(RunOutcome::Elapsed(1.5));
/// assert_eq!(ok.runtime(), Some(1.5));
///
/// let failed = RunMetrics::from(RunOutcome::Failed);
/// assert_eq!(failed.value(), -1.0);
/// assert!(!failed.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RunMetrics {
    Completed(Metrics),
    Failed(f64),
}

impl RunMetrics {
    /// Returns the runtime in seconds, if the run succeeded.
    pub fn runtime(&self) -> Option<f64> {
        match self {
            Self::Completed(metrics) => Some(metrics.runtime),
            Self::Failed(_) => None,
        }
    }

    /// Returns the runtime on success, otherwise the negative sentinel.
    pub fn value(&self) -> f64 {
        match self {
            Self::Completed(metrics) => metrics.runtime,
            Self::Failed(sentinel) => *sentinel,
        }
    }

    /// Returns true if the run succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

impl From<RunOutcome> for RunMetrics {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Elapsed(runtime) => Self::Completed(Metrics { runtime }),
            other => Self::Failed(other.sentinel()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_classification() {
        assert_eq!(RunOutcome::from_sentinel(0.0), RunOutcome::Elapsed(0.0));
        assert_eq!(RunOutcome::from_sentinel(-1.0), RunOutcome::Failed);
        assert_eq!(RunOutcome::from_sentinel(-2.0), RunOutcome::TimedOut);
        assert_eq!(RunOutcome::from_sentinel(f64::NAN), RunOutcome::Failed);
    }

    #[test]
    fn test_timeout_propagates_unchanged() {
        let metrics = RunMetrics::from(RunOutcome::TimedOut);
        assert_eq!(metrics, RunMetrics::Failed(TIMEOUT_SENTINEL));
    }

    #[test]
    fn test_success_serializes_as_runtime_map() {
        let metrics = RunMetrics::from(RunOutcome::Elapsed(0.5));
        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(json, r#"{"Runtime":0.5}"#);
    }

    #[test]
    fn test_failure_serializes_as_bare_number() {
        let json = serde_json::to_string(&RunMetrics::from(RunOutcome::Failed)).unwrap();
        assert_eq!(json, "-1.0");

        let parsed: RunMetrics = serde_json::from_str("-1.0").unwrap();
        assert_eq!(parsed, RunMetrics::Failed(-1.0));
    }
}
