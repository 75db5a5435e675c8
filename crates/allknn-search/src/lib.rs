//! Nearest-neighbor search backends for the AllKNN harness.
//!
//! The harness never searches on its own; it hands a [`KnnRequest`] to a
//! [`NeighborSearch`] implementation and only times the call. The default
//! backend, [`LinfaSearch`], delegates to `linfa-nn` indexes.
//!
//! # Example
//!
//! ```
//! use allknn_config::BenchmarkConfig;
//! use allknn_search::{KnnRequest, LinfaSearch, NeighborSearch};
//! use ndarray::array;
//!
//! let points = array![[0.0, 0.0], [1.0, 0.0], [0.0, 3.0]];
//! let config = BenchmarkConfig::new(1);
//!
//! // Self-query: ask for k + 1 so the point itself can be discarded.
//! let request = KnnRequest::new(points.view(), points.view(), 2, &config);
//! let table = LinfaSearch::new().k_nearest(&request).unwrap();
//!
//! assert_eq!(table.indices().row(0).to_vec(), vec![0, 1]);
//! assert_eq!(table.without_self().indices().row(0).to_vec(), vec![1]);
//! ```

mod distance;
mod linfa;
mod table;

use ndarray::ArrayView2;
use thiserror::Error;

use allknn_config::BenchmarkConfig;
use allknn_core::{Metric, TreeType};

pub use distance::Measure;
pub use linfa::LinfaSearch;
pub use table::NeighborTable;

/// Errors reported by a search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Reference set is empty")]
    EmptyReference,

    #[error("Expected n_neighbors > 0, got 0")]
    ZeroNeighbors,

    #[error("Expected n_neighbors <= n_samples, but n_samples = {samples}, n_neighbors = {k}")]
    TooManyNeighbors { k: usize, samples: usize },

    #[error("Query points have {query} features, reference points have {reference}")]
    DimensionMismatch { query: usize, reference: usize },

    #[error("Metric '{metric}' not valid for algorithm '{tree_type}'")]
    UnsupportedMetric { metric: Metric, tree_type: TreeType },

    #[error("n_jobs == 0 has no meaning")]
    InvalidJobs,

    #[error("Could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Index construction failed: {0}")]
    Build(#[from] linfa_nn::BuildError),

    #[error("Neighbor query failed: {0}")]
    Query(#[from] linfa_nn::NnError),

    #[error("Result shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("{0}")]
    Backend(String),
}

/// One AllKNN query: find the `k` nearest reference points for every row
/// of `queries`.
///
/// `k` is the number the backend must return, which may differ from
/// `config.k()` (self-queries ask for one extra neighbor).
#[derive(Debug, Clone, Copy)]
pub struct KnnRequest<'a> {
    pub reference: ArrayView2<'a, f64>,
    pub queries: ArrayView2<'a, f64>,
    pub k: usize,
    pub config: &'a BenchmarkConfig,
}

impl<'a> KnnRequest<'a> {
    /// Creates a request.
    pub fn new(
        reference: ArrayView2<'a, f64>,
        queries: ArrayView2<'a, f64>,
        k: usize,
        config: &'a BenchmarkConfig,
    ) -> Self {
        Self {
            reference,
            queries,
            k,
            config,
        }
    }

    /// Returns the number of query rows.
    pub fn query_count(&self) -> usize {
        self.queries.nrows()
    }
}

/// A nearest-neighbor search primitive.
///
/// Implementations must be shareable with the benchmark worker thread.
pub trait NeighborSearch: Send + Sync {
    /// Returns the `request.k` nearest reference points of every query row,
    /// nearest first.
    fn k_nearest(&self, request: &KnnRequest<'_>) -> Result<NeighborTable, SearchError>;
}
