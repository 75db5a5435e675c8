//! Dataset loading.

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use allknn_config::DatasetSource;
use allknn_core::error::{HarnessError, Result};

/// Points loaded for one run.
///
/// Holds the reference matrix and, when the run was given two files, a
/// separate query matrix. Without one, the reference set is queried against
/// itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    reference: Array2<f64>,
    query: Option<Array2<f64>>,
}

impl Dataset {
    /// Wraps matrices that are already in memory.
    pub fn new(reference: Array2<f64>, query: Option<Array2<f64>>) -> Self {
        Self { reference, query }
    }

    /// Loads the file(s) named by `source`.
    pub fn load(source: &DatasetSource) -> Result<Self> {
        let reference = load_matrix(source.reference())?;
        let query = source.query().map(load_matrix).transpose()?;
        Ok(Self { reference, query })
    }

    /// Returns the reference points.
    pub fn reference(&self) -> ArrayView2<'_, f64> {
        self.reference.view()
    }

    /// Returns the separate query points, if the run has them.
    pub fn query(&self) -> Option<ArrayView2<'_, f64>> {
        self.query.as_ref().map(|q| q.view())
    }

    /// Returns the points to search for: the query set, or the reference
    /// set itself.
    pub fn queries(&self) -> ArrayView2<'_, f64> {
        self.query().unwrap_or_else(|| self.reference())
    }

    /// Returns true if queries are the reference set itself.
    pub fn is_self_query(&self) -> bool {
        self.query.is_none()
    }

    /// Returns the number of reference points.
    pub fn reference_size(&self) -> usize {
        self.reference.nrows()
    }
}

/// Reads a comma-separated numeric file into a matrix.
///
/// Every row must have the same number of columns and every field must
/// parse as a finite number. Lines starting with `#` are skipped.
pub fn load_matrix(path: &Path) -> Result<Array2<f64>> {
    let fail = |reason: String| HarnessError::DatasetLoad {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(|err| fail(err.to_string()))?;

    let mut values = Vec::new();
    let mut cols = 0;
    let mut rows = 0;
    for record in reader.records() {
        let record = record.map_err(|err| fail(err.to_string()))?;
        cols = record.len();
        for (col, field) in record.iter().enumerate() {
            let value: f64 = field.parse().map_err(|_| {
                fail(format!(
                    "line {}, column {}: '{}' is not a number",
                    rows + 1,
                    col + 1,
                    field
                ))
            })?;
            if !value.is_finite() {
                return Err(fail(format!(
                    "line {}, column {}: '{}' is not finite",
                    rows + 1,
                    col + 1,
                    field
                )));
            }
            values.push(value);
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(fail("file contains no rows".to_string()));
    }

    let matrix =
        Array2::from_shape_vec((rows, cols), values).map_err(|err| fail(err.to_string()))?;
    debug!(path = %path.display(), rows, cols, "loaded dataset");
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "points.csv", "1,2,3\n4, 5 ,6\n");

        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.dim(), (2, 3));
        assert_eq!(matrix[[1, 1]], 5.0);
    }

    #[test]
    fn test_load_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "points.csv", "# x,y\n1.5,2\n-3,4e2\n");

        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.dim(), (2, 2));
        assert_eq!(matrix[[1, 1]], 400.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_matrix(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, HarnessError::DatasetLoad { .. }));
    }

    #[test]
    fn test_non_numeric_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.csv", "1,2\n3,abc\n");

        let err = load_matrix(&path).unwrap_err();
        assert!(err.to_string().contains("line 2, column 2: 'abc' is not a number"));
    }

    #[test]
    fn test_non_finite_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "nan.csv", "1,NaN\n");
        assert!(load_matrix(&path).is_err());
    }

    #[test]
    fn test_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "ragged.csv", "1,2,3\n4,5\n");
        assert!(load_matrix(&path).is_err());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "empty.csv", "");
        assert!(load_matrix(&path).is_err());
    }

    #[test]
    fn test_load_pair() {
        let dir = tempfile::tempdir().unwrap();
        let reference = write(&dir, "ref.csv", "0,0\n1,1\n2,2\n");
        let query = write(&dir, "query.csv", "0.5,0.5\n");

        let dataset = Dataset::load(&DatasetSource::Pair { reference, query }).unwrap();
        assert_eq!(dataset.reference_size(), 3);
        assert!(!dataset.is_self_query());
        assert_eq!(dataset.queries().nrows(), 1);
    }

    #[test]
    fn test_single_dataset_queries_itself() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "ref.csv", "0,0\n1,1\n");

        let dataset = Dataset::load(&DatasetSource::Single(path)).unwrap();
        assert!(dataset.is_self_query());
        assert_eq!(dataset.queries(), dataset.reference());
    }
}
