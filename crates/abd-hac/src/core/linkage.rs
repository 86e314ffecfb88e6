//! Linkage strategies: how the distance to a freshly merged cluster is derived.
//!
//! Every strategy is a Lance-Williams style recurrence. When clusters `i` and
//! `j` are merged, the distance from every other active cluster `x` to the new
//! cluster is computed from the three known distances `d(x, i)`, `d(x, j)` and
//! `d(i, j)` and, for the size-aware strategies, the cardinalities `n_i`,
//! `n_j` and `n_x`. No item-level distance is ever recomputed.

use core::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ClusteringError;

/// How a new item is compared against the members of a final cluster when it
/// is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRule {
    /// The distance to the closest member.
    Nearest,
    /// The distance to the farthest member.
    Farthest,
    /// The mean distance to all members.
    Mean,
}

impl ItemRule {
    /// Reduces the distances from a new item to the members of one cluster to
    /// a single score. Lower is closer.
    #[must_use]
    pub fn score(self, distances: &[f64]) -> Option<f64> {
        match self {
            Self::Nearest => distances.iter().copied().reduce(f64::min),
            Self::Farthest => distances.iter().copied().reduce(f64::max),
            Self::Mean => crate::utils::mean(distances),
        }
    }
}

/// A rule for computing the distance from an untouched cluster to a cluster
/// that results from merging two others.
///
/// The built-in strategies are the variants of [`Linkage`]. Implement this
/// trait to inject a custom recurrence into the
/// [`Agglomerative`](crate::Agglomerative) builder.
#[allow(clippy::module_name_repetitions)]
pub trait LinkageStrategy {
    /// The name of the strategy.
    fn name(&self) -> &str;

    /// Returns the distance from cluster `x` to the union of clusters `i` and
    /// `j`.
    ///
    /// # Arguments
    ///
    /// * `d_xi` - The distance from `x` to `i`.
    /// * `d_xj` - The distance from `x` to `j`.
    /// * `d_ij` - The distance from `i` to `j`.
    /// * `n_i` - The cardinality of `i`.
    /// * `n_j` - The cardinality of `j`.
    /// * `n_x` - The cardinality of `x`.
    fn linkage_distance(&self, d_xi: f64, d_xj: f64, d_ij: f64, n_i: usize, n_j: usize, n_x: usize) -> f64;

    /// Whether successive merge distances are guaranteed to be non-decreasing.
    fn is_monotonic(&self) -> bool {
        false
    }

    /// The item-level rule used to classify new items, or `None` if the
    /// strategy depends on bookkeeping that cannot be replayed against a new
    /// item.
    fn item_rule(&self) -> Option<ItemRule> {
        None
    }
}

/// The seven built-in linkage strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Linkage {
    /// The distance between the closest members.
    #[default]
    Single,
    /// The distance between the farthest members.
    Complete,
    /// The mean distance over all cross pairs of members (UPGMA).
    ///
    /// Derived from the cross-pair sums, this reduces to the same recurrence
    /// as [`Linkage::Weighted`], so the two build identical dendrograms.
    Average,
    /// The cardinality-weighted mean of the distances to the two merged
    /// clusters, `(n_i·d_xi + n_j·d_xj) / (n_i + n_j)`.
    ///
    /// This is the same recurrence as [`Linkage::Average`] under another name.
    Weighted,
    /// The distance between centroids (UPGMC). Not monotonic.
    Centroid,
    /// The distance between weighted centroids (WPGMC). Not monotonic.
    Median,
    /// Minimum variance.
    Ward,
}

impl Linkage {
    /// All the built-in strategies.
    pub const ALL: [Self; 7] = [
        Self::Single,
        Self::Complete,
        Self::Average,
        Self::Weighted,
        Self::Centroid,
        Self::Median,
        Self::Ward,
    ];

    /// The short name of the strategy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
            Self::Weighted => "weighted",
            Self::Centroid => "centroid",
            Self::Median => "median",
            Self::Ward => "ward",
        }
    }
}

impl LinkageStrategy for Linkage {
    fn name(&self) -> &str {
        self.as_str()
    }

    #[allow(clippy::cast_precision_loss)]
    fn linkage_distance(&self, d_xi: f64, d_xj: f64, d_ij: f64, n_i: usize, n_j: usize, n_x: usize) -> f64 {
        let (n_i, n_j, n_x) = (n_i as f64, n_j as f64, n_x as f64);
        let n_ij = n_i + n_j;
        match self {
            Self::Single => d_xi.min(d_xj),
            Self::Complete => d_xi.max(d_xj),
            // The cross-pair sums are `n_x·n_i·d_xi` and `n_x·n_j·d_xj` over
            // `n_x·n_ij` pairs, and `n_x` cancels.
            Self::Average | Self::Weighted => (n_i * d_xi + n_j * d_xj) / n_ij,
            Self::Centroid => (n_i * d_xi + n_j * d_xj) / n_ij - n_i * n_j * d_ij / (n_ij * n_ij),
            Self::Median => 0.5 * d_xi + 0.5 * d_xj - 0.25 * d_ij,
            Self::Ward => {
                ((n_i + n_x) * d_xi + (n_j + n_x) * d_xj) / (n_ij + n_x) - n_x * d_ij / (n_ij * n_ij)
            }
        }
    }

    fn is_monotonic(&self) -> bool {
        matches!(self, Self::Single | Self::Complete | Self::Average | Self::Weighted)
    }

    fn item_rule(&self) -> Option<ItemRule> {
        match self {
            Self::Single => Some(ItemRule::Nearest),
            Self::Complete => Some(ItemRule::Farthest),
            Self::Average | Self::Weighted => Some(ItemRule::Mean),
            Self::Centroid | Self::Median | Self::Ward => None,
        }
    }
}

impl Display for Linkage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Linkage {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "single" => Ok(Self::Single),
            "complete" => Ok(Self::Complete),
            "average" | "upgma" => Ok(Self::Average),
            "weighted" | "weighted-average" | "wpgma" => Ok(Self::Weighted),
            "centroid" | "upgmc" => Ok(Self::Centroid),
            "median" | "wpgmc" => Ok(Self::Median),
            "ward" => Ok(Self::Ward),
            _ => Err(ClusteringError::invalid_parameter(format!("unknown linkage: {s:?}"))),
        }
    }
}

impl<L: LinkageStrategy + ?Sized> LinkageStrategy for &L {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn linkage_distance(&self, d_xi: f64, d_xj: f64, d_ij: f64, n_i: usize, n_j: usize, n_x: usize) -> f64 {
        (**self).linkage_distance(d_xi, d_xj, d_ij, n_i, n_j, n_x)
    }

    fn is_monotonic(&self) -> bool {
        (**self).is_monotonic()
    }

    fn item_rule(&self) -> Option<ItemRule> {
        (**self).item_rule()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use test_case::test_case;

    use super::{ItemRule, Linkage, LinkageStrategy};

    // d(x, i) = 2, d(x, j) = 6, d(i, j) = 4, n_i = 1, n_j = 3, n_x = 2
    #[test_case(Linkage::Single, 2.0; "single")]
    #[test_case(Linkage::Complete, 6.0; "complete")]
    #[test_case(Linkage::Average, 5.0; "average")]
    #[test_case(Linkage::Weighted, 5.0; "weighted")]
    #[test_case(Linkage::Centroid, 5.0 - 0.75; "centroid")]
    #[test_case(Linkage::Median, 3.0; "median")]
    #[test_case(Linkage::Ward, (3.0 * 2.0 + 5.0 * 6.0) / 6.0 - 0.5; "ward")]
    fn recurrences(linkage: Linkage, expected: f64) {
        let actual = linkage.linkage_distance(2.0, 6.0, 4.0, 1, 3, 2);
        assert!(approx_eq!(f64, actual, expected, ulps = 4), "{linkage}: {actual} vs {expected}");
    }

    #[test]
    fn average_and_weighted_agree() {
        for (d_xi, d_xj, n_i, n_j, n_x) in [(2.0, 6.0, 1, 3, 2), (0.5, 9.0, 7, 2, 11), (3.0, 3.0, 1, 1, 1)] {
            let a = Linkage::Average.linkage_distance(d_xi, d_xj, 1.0, n_i, n_j, n_x);
            let w = Linkage::Weighted.linkage_distance(d_xi, d_xj, 1.0, n_i, n_j, n_x);
            assert_eq!(a, w);
        }
    }

    #[test]
    fn median_can_invert() {
        // The merged cluster is closer to `x` than either of its parts.
        let d = Linkage::Median.linkage_distance(1.0, 1.0, 1.8, 1, 1, 1);
        assert!(d < 1.0);
    }

    #[test]
    fn names_round_trip() {
        for linkage in Linkage::ALL {
            assert_eq!(linkage.to_string().parse::<Linkage>(), Ok(linkage));
        }
        assert_eq!(" UPGMA ".parse::<Linkage>(), Ok(Linkage::Average));
        assert!("nearest".parse::<Linkage>().is_err());
    }

    #[test]
    fn classification_support() {
        let supported = Linkage::ALL
            .into_iter()
            .filter(|l| l.item_rule().is_some())
            .collect::<Vec<_>>();
        assert_eq!(
            supported,
            vec![Linkage::Single, Linkage::Complete, Linkage::Average, Linkage::Weighted]
        );
    }

    #[test]
    fn item_rules() {
        let distances = [3.0, 1.0, 5.0];
        assert_eq!(ItemRule::Nearest.score(&distances), Some(1.0));
        assert_eq!(ItemRule::Farthest.score(&distances), Some(5.0));
        assert_eq!(ItemRule::Mean.score(&distances), Some(3.0));
        assert_eq!(ItemRule::Mean.score(&[]), None);
    }
}
