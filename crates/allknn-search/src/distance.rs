//! Distance functions handed to `linfa-nn`.

use linfa_nn::distance::Distance;
use ndarray::{ArrayView, Dimension};

use allknn_core::Metric;

/// A concrete distance function resolved from a metric and exponent.
///
/// # Example
///
/// ```
/// use allknn_core::Metric;
/// use allknn_search::Measure;
///
/// assert_eq!(Measure::from_metric(Metric::Minkowski, 1), Measure::Manhattan);
/// assert_eq!(Measure::from_metric(Metric::Minkowski, 2), Measure::Euclidean);
/// assert_eq!(Measure::from_metric(Metric::Minkowski, 3), Measure::Minkowski(3.0));
/// assert_eq!(Measure::from_metric(Metric::L2, 7), Measure::Euclidean);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Manhattan,
    Euclidean,
    Minkowski(f64),
    /// One minus cosine similarity. Zero vectors are at distance 1.
    Cosine,
}

impl Measure {
    /// Resolves a metric. `p` only matters for [`Metric::Minkowski`].
    pub fn from_metric(metric: Metric, p: u32) -> Self {
        match metric {
            Metric::Cityblock | Metric::L1 | Metric::Manhattan => Self::Manhattan,
            Metric::Euclidean | Metric::L2 => Self::Euclidean,
            Metric::Cosine => Self::Cosine,
            Metric::Minkowski => match p {
                1 => Self::Manhattan,
                2 => Self::Euclidean,
                p => Self::Minkowski(f64::from(p)),
            },
        }
    }
}

impl Distance<f64> for Measure {
    fn distance<D: Dimension>(&self, a: ArrayView<f64, D>, b: ArrayView<f64, D>) -> f64 {
        let pairs = a.iter().zip(b.iter());
        match *self {
            Self::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
            Self::Euclidean => pairs.map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt(),
            Self::Minkowski(p) => pairs
                .map(|(x, y)| (x - y).abs().powf(p))
                .sum::<f64>()
                .powf(p.recip()),
            Self::Cosine => {
                let (dot, norm_a, norm_b) = pairs.fold((0.0, 0.0, 0.0), |(dot, na, nb), (x, y)| {
                    (dot + x * y, na + x * x, nb + y * y)
                });
                if norm_a == 0.0 || norm_b == 0.0 {
                    1.0
                } else {
                    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
                }
            }
        }
    }
}
