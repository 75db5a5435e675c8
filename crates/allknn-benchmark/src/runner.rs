//! AllKNN benchmark runner.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info};

use allknn_config::{BenchmarkConfig, ConfigError, DatasetSource, HarnessConfig};
use allknn_core::error::{HarnessError, Result};
use allknn_core::{LogSink, RunMetrics, RunOutcome};
use allknn_search::{KnnRequest, LinfaSearch, NeighborSearch};

use crate::dataset::Dataset;
use crate::log::TracingLog;
use crate::result::{RunRecord, SuiteResult};
use crate::timeout::{Completion, TimeoutRunner};
use crate::timer::Timer;

/// Returns how many neighbors to request from the search backend.
///
/// A self-query finds every point as its own nearest neighbor, so it asks
/// for one extra neighbor that callers can discard. This keeps timings
/// comparable with tools that exclude self matches by construction.
///
/// # Example
///
/// ```
/// use allknn_benchmark::requested_neighbors;
///
/// assert_eq!(requested_neighbors(3, true), 4);
/// assert_eq!(requested_neighbors(3, false), 3);
/// ```
pub fn requested_neighbors(k: usize, self_query: bool) -> usize {
    if self_query {
        k + 1
    } else {
        k
    }
}

/// Times All-K-Nearest-Neighbors on one dataset.
///
/// Each call to [`run_metrics`](Self::run_metrics) loads the dataset,
/// validates the options, and times the neighbor search on a worker thread
/// bounded by the timeout. Failures never escape as errors: they are logged
/// through the [`LogSink`] and reported as a negative sentinel.
///
/// # Type Parameters
///
/// * `N` - The neighbor search backend
/// * `L` - The log sink
///
/// # Example
///
/// ```no_run
/// use allknn_benchmark::AllKnnBenchmark;
/// use allknn_config::DatasetSource;
///
/// let benchmark = AllKnnBenchmark::new(DatasetSource::Single("wine.csv".into()))
///     .with_timeout_secs(60)
///     .with_verbose(false);
///
/// match benchmark.run_metrics("-k 3 -t ball_tree").runtime() {
///     Some(seconds) => println!("AllKNN took {seconds:.3}s"),
///     None => println!("AllKNN failed"),
/// }
/// ```
pub struct AllKnnBenchmark<N = LinfaSearch, L = TracingLog> {
    source: DatasetSource,
    timeout: TimeoutRunner,
    verbose: bool,
    search: Arc<N>,
    log: Arc<L>,
}

impl AllKnnBenchmark {
    /// Creates a benchmark with the `linfa-nn` backend, `tracing` logging,
    /// no timeout, and verbose progress messages.
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            timeout: TimeoutRunner::default(),
            verbose: true,
            search: Arc::new(LinfaSearch::new()),
            log: Arc::new(TracingLog),
        }
    }
}

impl<N, L> AllKnnBenchmark<N, L>
where
    N: NeighborSearch + 'static,
    L: LogSink + 'static,
{
    /// Sets the timeout in seconds; 0 waits for as long as the run takes.
    pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout = TimeoutRunner::from_secs(seconds);
        self
    }

    /// Sets the timeout runner directly.
    pub fn with_timeout(mut self, timeout: TimeoutRunner) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables Info progress messages.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replaces the search backend.
    pub fn with_search<M: NeighborSearch + 'static>(self, search: M) -> AllKnnBenchmark<M, L> {
        self.with_shared_search(Arc::new(search))
    }

    /// Replaces the search backend with one shared across benchmarks.
    pub fn with_shared_search<M: NeighborSearch + 'static>(
        self,
        search: Arc<M>,
    ) -> AllKnnBenchmark<M, L> {
        AllKnnBenchmark {
            source: self.source,
            timeout: self.timeout,
            verbose: self.verbose,
            search,
            log: self.log,
        }
    }

    /// Replaces the log sink.
    pub fn with_log<M: LogSink + 'static>(self, log: M) -> AllKnnBenchmark<N, M> {
        self.with_shared_log(Arc::new(log))
    }

    /// Replaces the log sink with one shared across benchmarks.
    pub fn with_shared_log<M: LogSink + 'static>(self, log: Arc<M>) -> AllKnnBenchmark<N, M> {
        AllKnnBenchmark {
            source: self.source,
            timeout: self.timeout,
            verbose: self.verbose,
            search: self.search,
            log,
        }
    }

    /// Returns the dataset source.
    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Runs AllKNN and returns `{"Runtime": seconds}` on success, or the
    /// negative sentinel unchanged on failure or timeout.
    pub fn run_metrics(&self, options: &str) -> RunMetrics {
        self.log.info("Perform ALLKNN.", self.verbose);
        RunMetrics::from(self.all_knn(options))
    }

    /// Runs AllKNN under the timeout and returns the raw outcome.
    pub fn all_knn(&self, options: &str) -> RunOutcome {
        let job = RunJob {
            source: self.source.clone(),
            options: options.to_string(),
            verbose: self.verbose,
            search: Arc::clone(&self.search),
            log: Arc::clone(&self.log),
        };

        let outcome = match self.timeout.run(move |slot| {
            slot.publish(job.execute());
        }) {
            Completion::Completed(outcome) => outcome,
            Completion::TimedOut => {
                let limit = self.timeout.timeout().unwrap_or_default();
                let err = HarnessError::TimeoutExceeded(limit);
                self.log.info(&err.to_string(), self.verbose);
                RunOutcome::TimedOut
            }
            Completion::Dropped => {
                self.log
                    .fatal("ALLKNN worker exited without reporting a result");
                RunOutcome::Failed
            }
        };

        if self.verbose {
            let runtime_us = match outcome {
                RunOutcome::Elapsed(seconds) => (seconds * 1e6) as u64,
                _ => 0,
            };
            info!(event = "run_end", status = status_label(outcome), runtime_us);
        }
        outcome
    }
}

pub(crate) fn status_label(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Elapsed(_) => "ok",
        RunOutcome::Failed => "failed",
        RunOutcome::TimedOut => "timeout",
    }
}

// Everything the worker thread needs, owned.
struct RunJob<N, L> {
    source: DatasetSource,
    options: String,
    verbose: bool,
    search: Arc<N>,
    log: Arc<L>,
}

impl<N: NeighborSearch, L: LogSink> RunJob<N, L> {
    fn execute(&self) -> RunOutcome {
        match self.try_execute() {
            Ok(seconds) => RunOutcome::Elapsed(seconds),
            Err(err) => {
                if err.is_fatal() {
                    self.log.fatal(&err.to_string());
                }
                RunOutcome::Failed
            }
        }
    }

    fn try_execute(&self) -> Result<f64> {
        self.log.info("Loading dataset", self.verbose);
        let dataset = Dataset::load(&self.source)?;
        let config = BenchmarkConfig::parse(&self.options, dataset.reference_size())?;
        let k = requested_neighbors(config.k(), dataset.is_self_query());

        debug!(
            event = "run_start",
            reference_rows = dataset.reference_size(),
            query_rows = dataset.queries().nrows(),
            k,
            tree_type = %config.tree_type(),
            metric = %config.metric()
        );

        let request = KnnRequest::new(dataset.reference(), dataset.queries(), k, &config);
        let timer = Timer::new();
        {
            let _scope = timer.start();
            let found = panic::catch_unwind(AssertUnwindSafe(|| self.search.k_nearest(&request)))
                .map_err(|payload| HarnessError::ExternalLibrary(panic_message(&*payload)))?;
            found.map_err(|err| HarnessError::ExternalLibrary(err.to_string()))?;
        }
        Ok(timer.elapsed())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

/// Runs every entry of a [`HarnessConfig`] with shared collaborators.
///
/// Runs execute one after another, each under the suite's timeout; a
/// failing run is recorded and the suite moves on.
pub struct Suite<N = LinfaSearch, L = TracingLog> {
    config: HarnessConfig,
    search: Arc<N>,
    log: Arc<L>,
}

impl Suite {
    /// Creates a suite with the default collaborators.
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_collaborators(config, LinfaSearch::new(), TracingLog)
    }
}

impl<N, L> Suite<N, L>
where
    N: NeighborSearch + 'static,
    L: LogSink + 'static,
{
    /// Creates a suite with the given backend and log sink.
    pub fn with_collaborators(config: HarnessConfig, search: N, log: L) -> Self {
        Self {
            config,
            search: Arc::new(search),
            log: Arc::new(log),
        }
    }

    /// Executes all runs in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a run names an unusable dataset
    /// list; nothing is executed in that case.
    pub fn run(&self) -> std::result::Result<SuiteResult, ConfigError> {
        self.config.validate()?;

        let mut result = SuiteResult::new();
        for run in &self.config.runs {
            let benchmark = AllKnnBenchmark::new(run.dataset_source()?)
                .with_timeout_secs(self.config.timeout_secs)
                .with_verbose(self.config.verbose)
                .with_shared_search(Arc::clone(&self.search))
                .with_shared_log(Arc::clone(&self.log));

            self.log
                .info(&format!("Running '{}'", run.name), self.config.verbose);
            let metrics = benchmark.run_metrics(&run.options);
            result.add_run(RunRecord::new(&run.name, &run.options, metrics));
        }
        Ok(result)
    }
}
