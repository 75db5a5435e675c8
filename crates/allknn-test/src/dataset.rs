//! Dataset fixtures.
//!
//! # Example
//!
//! ```
//! use allknn_test::dataset::TempDataset;
//!
//! let data = TempDataset::single(10, 3, 7);
//! assert!(data.reference_path().exists());
//! assert_eq!(data.source().query(), None);
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

use allknn_config::DatasetSource;

/// Returns a `rows x cols` matrix of uniform values in `[0, 1)`.
///
/// The same seed always yields the same matrix.
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.random::<f64>())
}

/// Renders a matrix as comma-separated lines.
pub fn to_csv(matrix: &Array2<f64>) -> String {
    let mut out = String::new();
    for row in matrix.rows() {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{}", fields.join(","));
    }
    out
}

/// Writes `matrix` to `dir/name` as CSV and returns the path.
pub fn write_csv(dir: &Path, name: &str, matrix: &Array2<f64>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, to_csv(matrix)).expect("failed to write dataset fixture");
    path
}

/// One or two CSV files living in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TempDataset {
    dir: TempDir,
    reference: PathBuf,
    query: Option<PathBuf>,
}

impl TempDataset {
    /// A seeded reference set queried against itself.
    pub fn single(rows: usize, cols: usize, seed: u64) -> Self {
        Self::from_matrices(&random_matrix(rows, cols, seed), None)
    }

    /// Seeded reference and query sets with the same dimensionality.
    pub fn pair(reference_rows: usize, query_rows: usize, cols: usize, seed: u64) -> Self {
        let reference = random_matrix(reference_rows, cols, seed);
        let query = random_matrix(query_rows, cols, seed.wrapping_add(1));
        Self::from_matrices(&reference, Some(&query))
    }

    /// Writes the given matrices.
    pub fn from_matrices(reference: &Array2<f64>, query: Option<&Array2<f64>>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let reference_path = write_csv(dir.path(), "reference.csv", reference);
        let query_path = query.map(|q| write_csv(dir.path(), "query.csv", q));
        Self {
            dir,
            reference: reference_path,
            query: query_path,
        }
    }

    /// Writes raw file contents as the reference set.
    pub fn from_text(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let reference = dir.path().join("reference.csv");
        fs::write(&reference, contents).expect("failed to write dataset fixture");
        Self {
            dir,
            reference,
            query: None,
        }
    }

    /// Returns the reference file path.
    pub fn reference_path(&self) -> &Path {
        &self.reference
    }

    /// Returns the query file path, if any.
    pub fn query_path(&self) -> Option<&Path> {
        self.query.as_deref()
    }

    /// Returns a path inside the fixture directory that does not exist.
    pub fn missing_path(&self) -> PathBuf {
        self.dir.path().join("missing.csv")
    }

    /// Returns the dataset source for these files.
    pub fn source(&self) -> DatasetSource {
        match &self.query {
            None => DatasetSource::Single(self.reference.clone()),
            Some(query) => DatasetSource::Pair {
                reference: self.reference.clone(),
                query: query.clone(),
            },
        }
    }
}
