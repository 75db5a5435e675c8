//! Suite result types.

use serde::Serialize;

use allknn_core::{RunMetrics, RunOutcome};

use crate::runner::status_label;

/// Result of one named run in a suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    /// Run name from the suite file.
    pub name: String,
    /// Option string the run was given.
    pub options: String,
    /// What `run_metrics` returned.
    pub metrics: RunMetrics,
}

impl RunRecord {
    /// Creates a run record.
    pub fn new(name: impl Into<String>, options: impl Into<String>, metrics: RunMetrics) -> Self {
        Self {
            name: name.into(),
            options: options.into(),
            metrics,
        }
    }

    /// Returns `"ok"`, `"failed"`, or `"timeout"`.
    ///
    /// # Example
    ///
    /// ```
    /// use allknn_benchmark::RunRecord;
    /// use allknn_core::{RunMetrics, RunOutcome};
    ///
    /// let record = RunRecord::new("wine", "-k 3", RunMetrics::from(RunOutcome::TimedOut));
    /// assert_eq!(record.status(), "timeout");
    /// ```
    pub fn status(&self) -> &'static str {
        status_label(RunOutcome::from_sentinel(self.metrics.value()))
    }
}

/// Results of every run in a suite, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuiteResult {
    /// Individual runs.
    pub runs: Vec<RunRecord>,
}

impl SuiteResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a run to the results.
    pub fn add_run(&mut self, run: RunRecord) {
        self.runs.push(run);
    }

    /// Returns the number of runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Returns the number of runs that produced a timing.
    pub fn success_count(&self) -> usize {
        self.runs.iter().filter(|r| r.metrics.is_success()).count()
    }

    /// Returns the number of runs that failed or timed out.
    pub fn failure_count(&self) -> usize {
        self.run_count() - self.success_count()
    }

    /// Returns true if every run produced a timing.
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Returns the summed runtime of successful runs, in seconds.
    ///
    /// # Example
    ///
    /// ```
    /// use allknn_benchmark::{RunRecord, SuiteResult};
    /// use allknn_core::{RunMetrics, RunOutcome};
    ///
    /// let mut result = SuiteResult::new();
    /// result.add_run(RunRecord::new("a", "-k 1", RunMetrics::from(RunOutcome::Elapsed(0.5))));
    /// result.add_run(RunRecord::new("b", "-k 1", RunMetrics::from(RunOutcome::Failed)));
    /// result.add_run(RunRecord::new("c", "-k 1", RunMetrics::from(RunOutcome::Elapsed(1.0))));
    ///
    /// assert_eq!(result.total_runtime(), 1.5);
    /// assert_eq!(result.failure_count(), 1);
    /// ```
    pub fn total_runtime(&self) -> f64 {
        self.runs.iter().filter_map(|r| r.metrics.runtime()).sum()
    }

    /// Returns the successful run with the smallest runtime.
    pub fn fastest(&self) -> Option<&RunRecord> {
        self.runs
            .iter()
            .filter_map(|r| r.metrics.runtime().map(|t| (t, r)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, r)| r)
    }

    /// Returns the successful run with the largest runtime.
    pub fn slowest(&self) -> Option<&RunRecord> {
        self.runs
            .iter()
            .filter_map(|r| r.metrics.runtime().map(|t| (t, r)))
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, r)| r)
    }
}
