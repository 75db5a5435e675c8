//! `linfa-nn` backed search.

use linfa_nn::distance::Distance;
use linfa_nn::{CommonNearestNeighbour, NearestNeighbour};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;

use allknn_core::{Metric, TreeType};

use crate::distance::Measure;
use crate::{KnnRequest, NeighborSearch, NeighborTable, SearchError};

/// Search backend built on `linfa-nn` indexes.
///
/// Tree types map onto `linfa-nn` algorithms:
///
/// | tree type   | algorithm                                   |
/// |-------------|---------------------------------------------|
/// | `kd_tree`   | `KdTree`                                    |
/// | `ball_tree` | `BallTree`                                  |
/// | `brute`     | `LinearSearch`                              |
/// | `auto`      | `LinearSearch` for cosine, `KdTree` otherwise |
///
/// Query rows are answered on a dedicated `rayon` pool sized from
/// `n_jobs`: positive values are thread counts, `-1` uses every core and
/// `-n` every core but `n - 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinfaSearch;

impl LinfaSearch {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl NeighborSearch for LinfaSearch {
    fn k_nearest(&self, request: &KnnRequest<'_>) -> Result<NeighborTable, SearchError> {
        let config = request.config;
        let reference = &request.reference;
        let queries = &request.queries;
        let k = request.k;

        if reference.nrows() == 0 {
            return Err(SearchError::EmptyReference);
        }
        if k == 0 {
            return Err(SearchError::ZeroNeighbors);
        }
        if k > reference.nrows() {
            return Err(SearchError::TooManyNeighbors {
                k,
                samples: reference.nrows(),
            });
        }
        if queries.ncols() != reference.ncols() {
            return Err(SearchError::DimensionMismatch {
                query: queries.ncols(),
                reference: reference.ncols(),
            });
        }

        let algorithm = resolve_algorithm(config.tree_type(), config.metric())?;
        let measure = Measure::from_metric(config.metric(), config.p());
        let pool = build_pool(config.n_jobs())?;

        debug!(
            algorithm = ?algorithm,
            measure = ?measure,
            leaf_size = config.leaf_size(),
            threads = pool.current_num_threads(),
            k,
            "building neighbor index"
        );

        let index = algorithm.from_batch_with_leaf_size(reference, config.leaf_size(), measure)?;

        let rows = pool.install(|| {
            (0..queries.nrows())
                .into_par_iter()
                .map(|row| -> Result<Vec<(usize, f64)>, SearchError> {
                    let point = queries.row(row);
                    let found = index.k_nearest(point, k)?;
                    Ok(found
                        .into_iter()
                        .map(|(neighbor, at)| (at, measure.distance(point, neighbor)))
                        .collect())
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        NeighborTable::from_rows(k, rows)
    }
}

pub(crate) fn resolve_algorithm(
    tree_type: TreeType,
    metric: Metric,
) -> Result<CommonNearestNeighbour, SearchError> {
    match (tree_type, metric.supports_trees()) {
        (TreeType::Brute, _) | (TreeType::Auto, false) => Ok(CommonNearestNeighbour::LinearSearch),
        (TreeType::Auto, true) | (TreeType::KdTree, true) => Ok(CommonNearestNeighbour::KdTree),
        (TreeType::BallTree, true) => Ok(CommonNearestNeighbour::BallTree),
        (tree_type, false) => Err(SearchError::UnsupportedMetric { metric, tree_type }),
    }
}

/// Resolves `n_jobs` to a thread count.
pub(crate) fn resolve_jobs(n_jobs: i64, available: usize) -> Result<usize, SearchError> {
    match n_jobs {
        0 => Err(SearchError::InvalidJobs),
        n if n > 0 => usize::try_from(n).map_err(|_| SearchError::InvalidJobs),
        n => {
            let excluded = usize::try_from(n.unsigned_abs() - 1).unwrap_or(usize::MAX);
            Ok(available.saturating_sub(excluded).max(1))
        }
    }
}

fn build_pool(n_jobs: i64) -> Result<ThreadPool, SearchError> {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let threads = resolve_jobs(n_jobs, available)?;
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("allknn-search-{}", i))
        .build()?)
}
