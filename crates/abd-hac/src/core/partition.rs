//! The result of a build: final clusters, the merge tree and the history.

use serde::{Deserialize, Serialize};

use super::{
    dendrogram::Snapshot, ClusteringError, Dataset, Dendrogram, Linkage, LinkageStrategy, Metric,
};
use crate::utils;

/// A final cluster: a set of items, identified by their indices in the
/// dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// The indices of the member items, in ascending order.
    indices: Vec<usize>,
}

impl Cluster {
    /// Creates a cluster from the indices of its members, in ascending order.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Returns the indices of the member items, in ascending order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the number of member items.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.indices.len()
    }

    /// Whether the item with the given index is a member.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Returns references to the member items of the given dataset.
    pub fn items<'a, I, D: Dataset<I>>(&self, data: &'a D) -> Vec<&'a I> {
        data.subset(&self.indices)
    }
}

/// The outcome of an agglomerative build.
///
/// The clusters are listed in the order of their slots when merging stopped:
/// clusters that were never merged keep their relative input order, followed
/// by merged clusters in the order they were created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition<L = Linkage> {
    /// The final clusters.
    clusters: Vec<Cluster>,
    /// Every merge that was performed.
    dendrogram: Dendrogram,
    /// The recorded snapshots, oldest first, if history was enabled.
    history: Option<Vec<Snapshot>>,
    /// The linkage strategy used to build the partition.
    linkage: L,
}

impl<L: LinkageStrategy> Partition<L> {
    /// Creates a partition from the members of each final cluster.
    pub(crate) fn new(
        clusters: Vec<Vec<usize>>,
        dendrogram: Dendrogram,
        history: Option<Vec<Snapshot>>,
        linkage: L,
    ) -> Self {
        Self {
            clusters: clusters.into_iter().map(Cluster::new).collect(),
            dendrogram,
            history,
            linkage,
        }
    }

    /// Returns the final clusters.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Returns the number of final clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether there are no clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Returns the number of items that were clustered.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.dendrogram.leaves()
    }

    /// Returns the merge tree.
    #[must_use]
    pub const fn dendrogram(&self) -> &Dendrogram {
        &self.dendrogram
    }

    /// Returns the number of merges that were performed.
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.dendrogram.len()
    }

    /// Returns the recorded snapshots, oldest first, if history was enabled.
    #[must_use]
    pub fn history(&self) -> Option<&[Snapshot]> {
        self.history.as_deref()
    }

    /// Returns the recorded snapshots, newest first, if history was enabled.
    pub fn history_newest_first(&self) -> Option<impl Iterator<Item = &Snapshot>> {
        self.history.as_ref().map(|h| h.iter().rev())
    }

    /// Returns the linkage strategy used to build the partition.
    pub const fn linkage(&self) -> &L {
        &self.linkage
    }

    /// Returns the index of the cluster that contains the given item.
    #[must_use]
    pub fn cluster_of(&self, index: usize) -> Option<usize> {
        self.clusters.iter().position(|c| c.contains(index))
    }

    /// Returns, for every item, the index of its cluster.
    #[must_use]
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.cardinality()];
        for (c, cluster) in self.clusters.iter().enumerate() {
            for &i in cluster.indices() {
                labels[i] = c;
            }
        }
        labels
    }

    /// Assigns a new item to the closest final cluster.
    ///
    /// The distance from the item to a cluster follows the linkage: the
    /// closest member for single linkage, the farthest member for complete
    /// linkage, and the mean over all members for average and weighted
    /// linkage. Ties go to the first cluster.
    ///
    /// # Arguments
    ///
    /// * `data`: the dataset that was clustered.
    /// * `metric`: the metric to compare the query with the items.
    /// * `query`: the new item.
    ///
    /// # Returns
    ///
    /// The index of the chosen cluster.
    ///
    /// # Errors
    ///
    /// * If the linkage cannot classify new items, i.e. for centroid, median
    ///   and Ward linkage.
    /// * If `data` does not have as many items as were clustered.
    pub fn classify<I, D: Dataset<I>, M: Metric<I>>(
        &self,
        data: &D,
        metric: &M,
        query: &I,
    ) -> Result<usize, ClusteringError> {
        let rule = self
            .linkage
            .item_rule()
            .ok_or_else(|| ClusteringError::unsupported(self.linkage.name(), "classify"))?;
        if data.cardinality() != self.cardinality() {
            return Err(ClusteringError::invalid_parameter(format!(
                "the partition covers {} items but the dataset has {}",
                self.cardinality(),
                data.cardinality()
            )));
        }

        let scores = self
            .clusters
            .iter()
            .map(|c| {
                let distances = data
                    .query_to_many(query, c.indices(), metric)
                    .into_iter()
                    .map(|(_, d)| d)
                    .collect::<Vec<_>>();
                rule.score(&distances).unwrap_or(f64::NAN)
            })
            .collect::<Vec<_>>();

        utils::arg_min(&scores)
            .map(|(c, _)| c)
            .ok_or_else(|| ClusteringError::invariant("a partition has no clusters"))
    }

    /// Assigns each of several new items to the closest final cluster.
    ///
    /// # Errors
    ///
    /// See [`Partition::classify`].
    pub fn classify_many<I, D: Dataset<I>, M: Metric<I>>(
        &self,
        data: &D,
        metric: &M,
        queries: &[I],
    ) -> Result<Vec<usize>, ClusteringError> {
        queries.iter().map(|q| self.classify(data, metric, q)).collect()
    }
}
