//! Configuration system for the AllKNN harness.
//!
//! Two kinds of configuration live here:
//!
//! - [`BenchmarkConfig`]: the validated per-run parameters parsed from an
//!   options string (`-k 3 --metric manhattan ...`).
//! - [`HarnessConfig`]: a benchmark suite loaded from TOML or YAML, listing
//!   datasets and options strings to run under a shared timeout.
//!
//! # Examples
//!
//! Load a suite from a TOML string:
//!
//! ```
//! use allknn_config::{DatasetSource, HarnessConfig};
//! use std::time::Duration;
//!
//! let config = HarnessConfig::from_toml_str(r#"
//!     timeout_secs = 60
//!
//!     [[runs]]
//!     name = "wine"
//!     dataset = ["datasets/wine.csv"]
//!     options = "-k 3"
//!
//!     [[runs]]
//!     name = "corel"
//!     dataset = ["datasets/corel_ref.csv", "datasets/corel_query.csv"]
//!     options = "-k 5 -t ball_tree"
//! "#).unwrap();
//!
//! assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
//! assert_eq!(config.runs.len(), 2);
//! assert!(matches!(config.runs[1].dataset_source().unwrap(), DatasetSource::Pair { .. }));
//! ```

mod options;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use options::{
    BenchmarkConfig, DEFAULT_LEAF_SIZE, DEFAULT_N_JOBS, DEFAULT_P, DEFAULT_RADIUS,
};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where a run reads its points from.
///
/// With a single file the reference set doubles as the query set. With a
/// pair, the first file is the reference set and the second the query set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Single(PathBuf),
    Pair { reference: PathBuf, query: PathBuf },
}

impl DatasetSource {
    /// Builds a source from one or two paths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero or more than two paths.
    pub fn from_paths<I, P>(paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        match paths.len() {
            1 => Ok(Self::Single(paths.remove(0))),
            2 => {
                let query = paths.remove(1);
                let reference = paths.remove(0);
                Ok(Self::Pair { reference, query })
            }
            n => Err(ConfigError::Invalid(format!(
                "expected one or two dataset files, got {}",
                n
            ))),
        }
    }

    /// Returns the reference file.
    pub fn reference(&self) -> &Path {
        match self {
            Self::Single(path) => path,
            Self::Pair { reference, .. } => reference,
        }
    }

    /// Returns the separate query file, if any.
    pub fn query(&self) -> Option<&Path> {
        match self {
            Self::Single(_) => None,
            Self::Pair { query, .. } => Some(query),
        }
    }
}

/// Benchmark suite configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HarnessConfig {
    /// Seconds to wait for each run; 0 waits indefinitely.
    #[serde(default)]
    pub timeout_secs: u64,

    /// Emit Info progress messages.
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    /// Runs to execute, in order.
    #[serde(default)]
    pub runs: Vec<RunConfig>,
}

fn default_verbose() -> bool {
    true
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            verbose: true,
            runs: Vec::new(),
        }
    }
}

impl HarnessConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing YAML for `.yaml`/`.yml`
    /// extensions and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, doesn't parse, or describes
    /// an invalid suite.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the per-run timeout in seconds.
    pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Sets verbosity.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Adds a run.
    pub fn with_run(mut self, run: RunConfig) -> Self {
        self.runs.push(run);
        self
    }

    /// Returns the timeout, or `None` when runs may take as long as they
    /// need.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Checks that every run names one or two dataset files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for run in &self.runs {
            run.dataset_source().map_err(|err| match err {
                ConfigError::Invalid(reason) => {
                    ConfigError::Invalid(format!("run '{}': {}", run.name, reason))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// One entry of a benchmark suite.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    /// Label used in reports.
    pub name: String,

    /// One file (reference only) or two files (reference, query).
    pub dataset: Vec<PathBuf>,

    /// Options string handed to the option parser.
    #[serde(default)]
    pub options: String,
}

impl RunConfig {
    /// Creates a run over the given dataset files.
    pub fn new(
        name: impl Into<String>,
        dataset: impl IntoIterator<Item = impl Into<PathBuf>>,
        options: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dataset: dataset.into_iter().map(Into::into).collect(),
            options: options.into(),
        }
    }

    /// Returns the dataset source for this run.
    pub fn dataset_source(&self) -> Result<DatasetSource, ConfigError> {
        DatasetSource::from_paths(self.dataset.iter().cloned())
    }
}

#[cfg(test)]
mod tests;
