//! Search results.

use ndarray::{Array2, ArrayView2};

use crate::SearchError;

/// Neighbor indices and distances, one row per query point, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborTable {
    indices: Array2<usize>,
    distances: Array2<f64>,
}

impl NeighborTable {
    /// Builds a table from per-row `(reference index, distance)` lists.
    ///
    /// Every row must hold exactly `k` entries.
    pub fn from_rows(k: usize, rows: Vec<Vec<(usize, f64)>>) -> Result<Self, SearchError> {
        let n_queries = rows.len();
        let (indices, distances): (Vec<usize>, Vec<f64>) = rows.into_iter().flatten().unzip();
        Ok(Self {
            indices: Array2::from_shape_vec((n_queries, k), indices)?,
            distances: Array2::from_shape_vec((n_queries, k), distances)?,
        })
    }

    /// Returns the neighbor indices into the reference set.
    pub fn indices(&self) -> ArrayView2<'_, usize> {
        self.indices.view()
    }

    /// Returns the neighbor distances.
    pub fn distances(&self) -> ArrayView2<'_, f64> {
        self.distances.view()
    }

    /// Returns the number of query rows.
    pub fn query_count(&self) -> usize {
        self.indices.nrows()
    }

    /// Returns the number of neighbors per row.
    pub fn k(&self) -> usize {
        self.indices.ncols()
    }

    /// Drops each row's self match from a self-query table.
    ///
    /// Row `i` loses the entry pointing at reference point `i`; rows where
    /// the point itself was not returned (duplicates tie with it) lose
    /// their farthest entry instead. The result has `k - 1` columns.
    pub fn without_self(&self) -> Self {
        let k = self.k().saturating_sub(1);
        let mut indices = Array2::zeros((self.query_count(), k));
        let mut distances = Array2::zeros((self.query_count(), k));

        let rows = self.indices.rows().into_iter().zip(self.distances.rows());
        for (row, (found, dists)) in rows.enumerate() {
            let skip = found
                .iter()
                .position(|index| *index == row)
                .unwrap_or(found.len().saturating_sub(1));
            let kept = found
                .iter()
                .zip(dists.iter())
                .enumerate()
                .filter(|(col, _)| *col != skip)
                .map(|(_, entry)| entry);
            for (col, (index, distance)) in kept.enumerate() {
                indices[[row, col]] = *index;
                distances[[row, col]] = *distance;
            }
        }

        Self { indices, distances }
    }
}
