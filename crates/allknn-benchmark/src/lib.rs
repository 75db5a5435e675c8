//! Benchmark harness for All-K-Nearest-Neighbors.
//!
//! Times one AllKNN computation per call under a configurable timeout and
//! reports the wall-clock runtime, or a negative sentinel when the run
//! failed or timed out.
//!
//! # Overview
//!
//! - [`AllKnnBenchmark`] loads a dataset, validates an option string, and
//!   times the neighbor search
//! - [`TimeoutRunner`] runs the work on a worker thread with a deadline
//! - [`Timer`] measures exactly the scoped search call
//! - [`Suite`] runs every entry of a suite file and collects a
//!   [`SuiteResult`], exportable with [`CsvExporter`] and [`MarkdownReport`]
//!
//! # Example
//!
//! ```no_run
//! use allknn_benchmark::AllKnnBenchmark;
//! use allknn_config::DatasetSource;
//!
//! let source = DatasetSource::from_paths(["reference.csv", "query.csv"]).unwrap();
//! let benchmark = AllKnnBenchmark::new(source).with_timeout_secs(120);
//!
//! let metrics = benchmark.run_metrics("-k 5 -t kd_tree -l 30 --n_jobs -1");
//! println!("{}", serde_json::to_string(&metrics).unwrap());
//! ```
//!
//! Failures are never returned as errors. The run reports them through its
//! [`LogSink`](allknn_core::LogSink) and returns `-1` (failure) or `-2`
//! (timeout) in place of the metrics map.

mod dataset;
mod log;
mod report;
mod result;
mod runner;
mod timeout;
mod timer;

#[cfg(test)]
mod tests;

pub use dataset::{load_matrix, Dataset};
pub use log::TracingLog;
pub use report::{CsvExporter, MarkdownReport};
pub use result::{RunRecord, SuiteResult};
pub use runner::{requested_neighbors, AllKnnBenchmark, Suite};
pub use timeout::{Completion, ResultSlot, TimeoutRunner};
pub use timer::{Timer, TimerScope};
