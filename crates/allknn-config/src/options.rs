//! Benchmark option parsing.
//!
//! Turns an options string such as `-k 3 -t ball_tree --metric manhattan`
//! into a validated [`BenchmarkConfig`]. Tokens are split on whitespace and
//! handed to a `clap` parser, so unknown flags, missing values, repeated
//! flags, and non-numeric values are rejected instead of silently falling
//! back to defaults. Range and membership checks run afterwards, in a fixed
//! order, and the first failure aborts the parse.

use clap::Parser;

use allknn_core::{Metric, TreeType, ValidationError};

/// Default leaf size for tree-based indexes.
pub const DEFAULT_LEAF_SIZE: usize = 20;

/// Default query radius.
pub const DEFAULT_RADIUS: f64 = 1.0;

/// Default Minkowski exponent (Euclidean distance).
pub const DEFAULT_P: u32 = 2;

/// Default number of parallel jobs.
pub const DEFAULT_N_JOBS: i64 = 1;

// Raw tokens as written; no range checks yet.
#[derive(Debug, Parser)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct RawOptions {
    #[arg(short = 'k', allow_negative_numbers = true)]
    k: Option<i64>,

    #[arg(short = 'l', allow_negative_numbers = true)]
    leaf_size: Option<i64>,

    #[arg(long = "radius", allow_negative_numbers = true)]
    radius: Option<f64>,

    #[arg(short = 't')]
    tree_type: Option<String>,

    #[arg(long = "metric")]
    metric: Option<String>,

    #[arg(short = 'p', allow_negative_numbers = true)]
    p: Option<i64>,

    #[arg(long = "n_jobs", allow_negative_numbers = true)]
    n_jobs: Option<i64>,
}

/// Validated parameters for one AllKNN run.
///
/// Built either by [`BenchmarkConfig::parse`] from an options string, or
/// programmatically through [`BenchmarkConfig::new`] and the `with_*`
/// methods.
///
/// # Example
///
/// ```
/// use allknn_config::BenchmarkConfig;
/// use allknn_core::{Metric, TreeType};
///
/// let config = BenchmarkConfig::parse("-k 3 -t ball_tree --metric manhattan", 100).unwrap();
///
/// assert_eq!(config.k(), 3);
/// assert_eq!(config.tree_type(), TreeType::BallTree);
/// assert_eq!(config.metric(), Metric::Manhattan);
/// assert_eq!(config.leaf_size(), 20);
/// assert_eq!(config.p(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    k: usize,
    leaf_size: usize,
    tree_type: TreeType,
    radius: f64,
    metric: Metric,
    p: u32,
    n_jobs: i64,
}

impl BenchmarkConfig {
    /// Creates a configuration for `k` neighbors with every other field at
    /// its default.
    ///
    /// Defaults:
    /// - leaf_size: 20
    /// - tree_type: kd_tree
    /// - radius: 1.0
    /// - metric: minkowski
    /// - p: 2
    /// - n_jobs: 1
    pub fn new(k: usize) -> Self {
        Self {
            k,
            leaf_size: DEFAULT_LEAF_SIZE,
            tree_type: TreeType::default(),
            radius: DEFAULT_RADIUS,
            metric: Metric::default(),
            p: DEFAULT_P,
            n_jobs: DEFAULT_N_JOBS,
        }
    }

    /// Parses and validates an options string.
    ///
    /// `reference_size` is the number of points in the reference set and
    /// bounds `k` from above.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MalformedOptions`] for unknown flags, missing or
    ///   repeated values, and non-numeric numbers
    /// - [`ValidationError::MissingRequiredOption`] when `-k` is absent
    /// - [`ValidationError::OutOfRangeOption`] for `k`, leaf size, `p`, or
    ///   `n_jobs` outside their ranges
    /// - [`ValidationError::InvalidEnumValue`] for unknown tree types or
    ///   metrics
    pub fn parse(options: &str, reference_size: usize) -> Result<Self, ValidationError> {
        let raw = RawOptions::try_parse_from(options.split_whitespace()).map_err(|err| {
            let rendered = err.to_string();
            let reason = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            ValidationError::MalformedOptions(reason)
        })?;

        let k = validate_k(raw.k, reference_size)?;
        let leaf_size = match raw.leaf_size {
            None => DEFAULT_LEAF_SIZE,
            Some(value) => usize::try_from(value).map_err(|_| ValidationError::OutOfRangeOption {
                option: "leaf size",
                value: value.to_string(),
                expected: "must be greater than or equal to 0".to_string(),
            })?,
        };
        let tree_type = match raw.tree_type {
            None => TreeType::default(),
            Some(name) => name.parse()?,
        };
        let radius = raw.radius.unwrap_or(DEFAULT_RADIUS);
        let p = match raw.p {
            None => DEFAULT_P,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| ValidationError::OutOfRangeOption {
                    option: "p",
                    value: value.to_string(),
                    expected: "must be a positive integer".to_string(),
                })?,
        };
        let metric = match raw.metric {
            None => Metric::default(),
            Some(name) => name.parse()?,
        };
        let n_jobs = raw.n_jobs.unwrap_or(DEFAULT_N_JOBS);

        Ok(Self {
            k,
            leaf_size,
            tree_type,
            radius,
            metric,
            p,
            n_jobs,
        })
    }

    /// Sets the leaf size.
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Sets the tree type.
    pub fn with_tree_type(mut self, tree_type: TreeType) -> Self {
        self.tree_type = tree_type;
        self
    }

    /// Sets the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the Minkowski exponent.
    pub fn with_p(mut self, p: u32) -> Self {
        self.p = p;
        self
    }

    /// Sets the number of parallel jobs.
    pub fn with_n_jobs(mut self, n_jobs: i64) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Returns the number of neighbors requested per query point.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the leaf size for tree-based indexes.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Returns the tree type.
    pub fn tree_type(&self) -> TreeType {
        self.tree_type
    }

    /// Returns the radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the distance metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the Minkowski exponent.
    pub fn p(&self) -> u32 {
        self.p
    }

    /// Returns the number of parallel jobs.
    pub fn n_jobs(&self) -> i64 {
        self.n_jobs
    }
}

fn validate_k(k: Option<i64>, reference_size: usize) -> Result<usize, ValidationError> {
    let Some(value) = k else {
        return Err(ValidationError::MissingRequiredOption {
            option: "k",
            description: "Number of nearest neighbors to find",
        });
    };

    usize::try_from(value)
        .ok()
        .filter(|k| (1..=reference_size).contains(k))
        .ok_or_else(|| ValidationError::OutOfRangeOption {
            option: "k",
            value: value.to_string(),
            expected: format!(
                "must be greater than 0 and less or equal than {}",
                reference_size
            ),
        })
}
