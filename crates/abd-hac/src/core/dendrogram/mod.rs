//! The merge tree produced by a build, and observers of the merge loop.

mod recorder;

pub use recorder::{FnObserver, HistoryRecorder, MergeEvent, MergeObserver, NoObserver, Snapshot};

use serde::{Deserialize, Serialize};

use super::{ClusterRegistry, ClusteringError};

/// A single merge of two clusters.
///
/// Nodes are numbered the way `scipy` numbers them: the leaves are `0..n`
/// and the cluster created by the `s`-th merge (0-based) is node `n + s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Merge {
    /// The smaller node id of the two merged clusters.
    pub left: usize,
    /// The larger node id of the two merged clusters.
    pub right: usize,
    /// The linkage distance at which the clusters were merged.
    pub distance: f64,
    /// The number of items in the merged cluster.
    pub cardinality: usize,
}

impl Merge {
    /// Creates a new `Merge`. The node ids may be given in any order.
    #[must_use]
    pub fn new(a: usize, b: usize, distance: f64, cardinality: usize) -> Self {
        Self {
            left: a.min(b),
            right: a.max(b),
            distance,
            cardinality,
        }
    }
}

/// Where to cut a `Dendrogram` to obtain a flat partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cut {
    /// Stop merging once this many clusters remain.
    Clusters(usize),
    /// Stop merging before the first merge whose distance exceeds this value.
    Distance(f64),
}

/// The ordered list of merges performed by a build.
///
/// The merge list is recorded for every build, regardless of whether the
/// snapshot history is enabled. A build that stopped early yields a forest
/// rather than a single tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dendrogram {
    /// The number of items that were clustered.
    leaves: usize,
    /// The merges, in the order they were performed.
    merges: Vec<Merge>,
}

impl Dendrogram {
    /// Creates a dendrogram with the given number of leaves and no merges.
    #[must_use]
    pub const fn new(leaves: usize) -> Self {
        Self {
            leaves,
            merges: Vec::new(),
        }
    }

    /// Appends a merge.
    pub(crate) fn push(&mut self, merge: Merge) {
        self.merges.push(merge);
    }

    /// Returns the number of leaves.
    #[must_use]
    pub const fn leaves(&self) -> usize {
        self.leaves
    }

    /// Returns the merges, in the order they were performed.
    #[must_use]
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Returns the number of merges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Whether no merges were performed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Returns the number of clusters left after all merges.
    ///
    /// A well-formed dendrogram has fewer merges than leaves. One that was
    /// deserialized from bad input reports zero roots.
    #[must_use]
    pub fn roots(&self) -> usize {
        self.leaves.saturating_sub(self.merges.len())
    }

    /// Returns the distance of the last merge.
    #[must_use]
    pub fn last_distance(&self) -> Option<f64> {
        self.merges.last().map(|m| m.distance)
    }

    /// Returns the steps whose merge distance is smaller than that of the
    /// previous merge.
    ///
    /// Single, complete, average and weighted linkage never produce
    /// inversions. Centroid and median linkage may.
    #[must_use]
    pub fn inversions(&self) -> Vec<usize> {
        self.merges
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[1].distance < w[0].distance)
            .map(|(s, _)| s + 1)
            .collect()
    }

    /// Whether the merge distances never decrease.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.inversions().is_empty()
    }

    /// Returns the merges in the `scipy` linkage-matrix format.
    ///
    /// Each row is `[left, right, distance, cardinality]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn linkage_matrix(&self) -> Vec<[f64; 4]> {
        self.merges
            .iter()
            .map(|m| [m.left as f64, m.right as f64, m.distance, m.cardinality as f64])
            .collect()
    }

    /// Returns the number of merges that a cut keeps.
    fn cut_depth(&self, cut: Cut) -> Result<usize, ClusteringError> {
        match cut {
            Cut::Clusters(k) => {
                if k == 0 || k > self.leaves {
                    Err(ClusteringError::invalid_target(k, self.leaves))
                } else if k < self.roots() {
                    Err(ClusteringError::invalid_parameter(format!(
                        "cannot cut into {k} clusters: the build stopped at {}",
                        self.roots()
                    )))
                } else {
                    Ok(self.leaves - k)
                }
            }
            Cut::Distance(t) => {
                if t.is_nan() || t < 0.0 {
                    Err(ClusteringError::InvalidMaxDistance(t))
                } else {
                    Ok(self
                        .merges
                        .iter()
                        .position(|m| m.distance > t)
                        .unwrap_or(self.merges.len()))
                }
            }
        }
    }

    /// Replays the first `depth` merges on a fresh registry.
    fn replay(&self, depth: usize) -> Result<ClusterRegistry, ClusteringError> {
        let mut registry = ClusterRegistry::new(self.leaves);
        for (step, m) in self.merges.iter().take(depth).enumerate() {
            let slots = registry.position_of_node(m.left).zip(registry.position_of_node(m.right));
            let (a, b) = slots.ok_or_else(|| {
                ClusteringError::invariant(format!("merge {step} refers to an inactive node"))
            })?;
            registry.merge(a.max(b), a.min(b), self.leaves + step)?;
        }
        Ok(registry)
    }

    /// Cuts the dendrogram into a flat partition.
    ///
    /// The clusters, and their order, are exactly those that a build with the
    /// same linkage would return when asked for the same number of clusters or
    /// given the same maximum distance.
    ///
    /// # Errors
    ///
    /// * If a cluster count is zero, larger than the number of leaves, or
    ///   smaller than the number of clusters the build stopped at.
    /// * If a distance is negative or NaN.
    pub fn cut(&self, cut: Cut) -> Result<Vec<Vec<usize>>, ClusteringError> {
        let depth = self.cut_depth(cut)?;
        Ok(self.replay(depth)?.into_clusters())
    }

    /// Returns, for every leaf, the index of its cluster in the given cut.
    ///
    /// # Errors
    ///
    /// See [`Dendrogram::cut`].
    pub fn labels(&self, cut: Cut) -> Result<Vec<usize>, ClusteringError> {
        let mut labels = vec![0; self.leaves];
        for (c, members) in self.cut(cut)?.into_iter().enumerate() {
            for i in members {
                labels[i] = c;
            }
        }
        Ok(labels)
    }

    /// Returns the leaves in depth-first, left-to-right order.
    ///
    /// Adjacent leaves in this order are never separated by a cluster that
    /// does not contain them both, which makes it a suitable axis ordering
    /// for plots. If the build stopped early, the trees of the forest follow
    /// the order of the final clusters.
    ///
    /// # Errors
    ///
    /// * If the merge list is corrupt.
    pub fn leaf_order(&self) -> Result<Vec<usize>, ClusteringError> {
        let registry = self.replay(self.merges.len())?;

        let mut order = Vec::with_capacity(self.leaves);
        for slot in 0..registry.len() {
            let mut stack = vec![registry.node(slot)];
            while let Some(node) = stack.pop() {
                if node < self.leaves {
                    order.push(node);
                } else {
                    let m = &self.merges[node - self.leaves];
                    stack.push(m.right);
                    stack.push(m.left);
                }
            }
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cut, Dendrogram, Merge};

    /// Leaves 0..5; merges {1,3} at 1, {0,2} at 2, {1,3,4} at 3.
    fn forest() -> Dendrogram {
        let mut d = Dendrogram::new(5);
        d.push(Merge::new(3, 1, 1.0, 2));
        d.push(Merge::new(0, 2, 2.0, 2));
        d.push(Merge::new(5, 4, 3.0, 3));
        d
    }

    #[test]
    fn cuts() {
        let d = forest();
        assert_eq!(d.roots(), 2);
        assert_eq!(d.cut(Cut::Clusters(5)).unwrap(), vec![vec![0], vec![1], vec![2], vec![3], vec![4]]);
        assert_eq!(d.cut(Cut::Clusters(4)).unwrap(), vec![vec![0], vec![2], vec![4], vec![1, 3]]);
        assert_eq!(d.cut(Cut::Clusters(2)).unwrap(), vec![vec![0, 2], vec![1, 3, 4]]);
        assert_eq!(d.cut(Cut::Distance(2.5)).unwrap(), d.cut(Cut::Clusters(3)).unwrap());
        assert_eq!(d.cut(Cut::Distance(0.5)).unwrap().len(), 5);

        assert_eq!(d.cut(Cut::Clusters(1)), Ok(vec![vec![0, 1]]));
        assert!(d.cut(Cut::Clusters(0)).is_err());
        assert!(d.cut(Cut::Clusters(6)).is_err());
        assert!(d.cut(Cut::Distance(f64::NAN)).is_err());
    }

    #[test]
    fn labels_and_order() {
        let d = forest();
        assert_eq!(d.labels(Cut::Clusters(2)).unwrap(), vec![0, 1, 0, 1, 1]);
        assert_eq!(d.leaf_order().unwrap(), vec![0, 2, 4, 1, 3]);
        assert_eq!(d.linkage_matrix()[2], [4.0, 5.0, 3.0, 3.0]);
    }

    #[test]
    fn inversions() {
        let mut d = forest();
        assert!(d.is_monotonic());
        d.push(Merge::new(6, 7, 2.5, 5));
        assert_eq!(d.inversions(), vec![3]);
        assert_eq!(d.last_distance(), Some(2.5));
    }

    #[test]
    fn too_many_merges() {
        let mut d = Dendrogram::new(2);
        d.push(Merge::new(0, 1, 1.0, 2));
        d.push(Merge::new(2, 3, 2.0, 3));
        d.push(Merge::new(4, 5, 3.0, 4));
        assert_eq!(d.roots(), 0);
        assert_eq!(d.cut(Cut::Clusters(1)), Ok(vec![vec![0, 1]]));
        assert!(d.leaf_order().is_err());
    }
}
