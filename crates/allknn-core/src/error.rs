//! Error types for the AllKNN harness

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Reasons an options string is rejected.
///
/// Produced by the option parser before any search work starts. The first
/// error found aborts the parse, so no partially filled configuration is
/// ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required option was not present at all.
    #[error("Required option: {description}.")]
    MissingRequiredOption {
        option: &'static str,
        description: &'static str,
    },

    /// A numeric option was present but outside its valid range.
    #[error("Invalid {option}: {value}; {expected}.")]
    OutOfRangeOption {
        option: &'static str,
        value: String,
        expected: String,
    },

    /// A categorical option named a value outside its allowed set.
    #[error("Invalid {option}: {value}. Must be either {allowed}.")]
    InvalidEnumValue {
        option: &'static str,
        value: String,
        allowed: &'static str,
    },

    /// The options string could not be tokenized into known flags.
    #[error("Malformed options: {0}")]
    MalformedOptions(String),
}

impl ValidationError {
    /// Returns the option this error refers to, if it names a single one.
    pub fn option(&self) -> Option<&'static str> {
        match self {
            Self::MissingRequiredOption { option, .. }
            | Self::OutOfRangeOption { option, .. }
            | Self::InvalidEnumValue { option, .. } => Some(option),
            Self::MalformedOptions(_) => None,
        }
    }
}

/// Main error type for AllKNN harness operations.
///
/// None of these cross the `run_metrics` boundary; the runner logs them and
/// converts them to a negative sentinel.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The options string was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A dataset file could not be read or parsed.
    #[error("Could not load dataset '{}': {reason}", path.display())]
    DatasetLoad { path: PathBuf, reason: String },

    /// The nearest-neighbor library reported an error.
    #[error("Nearest-neighbor search failed: {0}")]
    ExternalLibrary(String),

    /// The run did not publish a result before the deadline.
    #[error("Benchmark exceeded the timeout of {0:?}")]
    TimeoutExceeded(Duration),
}

impl HarnessError {
    /// Returns true if this error should be reported on the Fatal channel.
    ///
    /// Timeouts are an expected harness outcome and are reported as Info.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TimeoutExceeded(_))
    }
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
