//! AllKNN Core - shared types for the AllKNN benchmark harness
//!
//! This crate provides the vocabulary every other harness crate speaks:
//! - Search parameter enums ([`TreeType`], [`Metric`])
//! - Run outcomes and the caller-facing [`RunMetrics`] contract
//! - The error taxonomy ([`HarnessError`], [`ValidationError`])
//! - The [`LogSink`] collaborator used for Info/Fatal reporting

pub mod error;
pub mod log;
pub mod outcome;
pub mod params;

pub use error::{HarnessError, ValidationError};
pub use log::LogSink;
pub use outcome::{Metrics, RunMetrics, RunOutcome, FAILURE_SENTINEL, TIMEOUT_SENTINEL};
pub use params::{Metric, TreeType};
