//! Categorical search parameters.
//!
//! Both enums parse from the exact lowercase names the options string uses
//! and render back to them, so a parsed value always round-trips through
//! logs and reports unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Spatial index used to answer neighbor queries.
///
/// # Example
///
/// ```
/// use allknn_core::TreeType;
///
/// let tree: TreeType = "ball_tree".parse().unwrap();
/// assert_eq!(tree, TreeType::BallTree);
/// assert_eq!(TreeType::default(), TreeType::KdTree);
/// assert!("octree".parse::<TreeType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeType {
    /// Let the backend choose from the metric.
    Auto,

    /// Ball tree.
    BallTree,

    /// k-d tree.
    #[default]
    KdTree,

    /// Exhaustive linear scan.
    Brute,
}

impl TreeType {
    /// Every accepted tree type, in documentation order.
    pub const ALL: [TreeType; 4] = [Self::Auto, Self::BallTree, Self::KdTree, Self::Brute];

    /// Human-readable list of accepted names, used in error messages.
    pub const ALLOWED: &'static str = "auto, ball_tree, kd_tree or brute";

    /// Returns the option-string name of this tree type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::BallTree => "ball_tree",
            Self::KdTree => "kd_tree",
            Self::Brute => "brute",
        }
    }
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tree| tree.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidEnumValue {
                option: "tree type",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            })
    }
}

/// Distance metric used to rank neighbors.
///
/// `Minkowski` is parameterized by the separate `p` option; `p = 1` is the
/// Manhattan distance and `p = 2` the Euclidean distance.
///
/// # Example
///
/// ```
/// use allknn_core::Metric;
///
/// let metric: Metric = "manhattan".parse().unwrap();
/// assert_eq!(metric, Metric::Manhattan);
/// assert_eq!(metric.to_string(), "manhattan");
/// assert_eq!(Metric::default(), Metric::Minkowski);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cityblock,
    Cosine,
    Euclidean,
    L1,
    L2,
    Manhattan,
    #[default]
    Minkowski,
}

impl Metric {
    /// Every accepted metric, in documentation order.
    pub const ALL: [Metric; 7] = [
        Self::Cityblock,
        Self::Cosine,
        Self::Euclidean,
        Self::L1,
        Self::L2,
        Self::Manhattan,
        Self::Minkowski,
    ];

    /// Human-readable list of accepted names, used in error messages.
    pub const ALLOWED: &'static str =
        "cityblock, cosine, euclidean, l1, l2, manhattan or minkowski";

    /// Returns the option-string name of this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cityblock => "cityblock",
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::L1 => "l1",
            Self::L2 => "l2",
            Self::Manhattan => "manhattan",
            Self::Minkowski => "minkowski",
        }
    }

    /// Returns true if the metric is meaningful for space-partitioning trees.
    ///
    /// Cosine distance violates the triangle inequality, so it is only
    /// valid with a linear scan.
    pub fn supports_trees(&self) -> bool {
        !matches!(self, Self::Cosine)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidEnumValue {
                option: "metric type",
                value: s.to_string(),
                allowed: Self::ALLOWED,
            })
    }
}
