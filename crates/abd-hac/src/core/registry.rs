//! Bookkeeping for which items belong to which active cluster.

use super::ClusteringError;
use crate::utils::take_pair;

/// An active cluster: its node id in the dendrogram and its member items.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    /// The node id of the cluster in the dendrogram.
    node: usize,
    /// The indices of the items in the cluster, in ascending order.
    members: Vec<usize>,
}

/// The list of active clusters, kept in the same slot order as the
/// [`DistanceMatrix`](crate::DistanceMatrix).
///
/// Initially, slot `i` holds the singleton cluster `{i}` with node id `i`.
/// After every merge the two merged slots are removed, the remaining slots
/// shift down, and the union is appended at the end. Members are always kept
/// in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRegistry {
    slots: Vec<Slot>,
}

impl ClusterRegistry {
    /// Creates a registry with one singleton cluster per item.
    #[must_use]
    pub fn new(cardinality: usize) -> Self {
        let slots = (0..cardinality)
            .map(|i| Slot {
                node: i,
                members: vec![i],
            })
            .collect();
        Self { slots }
    }

    /// Returns the number of active clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no active clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of items in the cluster at the given slot.
    ///
    /// # Panics
    ///
    /// * If the slot is out of bounds.
    #[must_use]
    pub fn cardinality(&self, slot: usize) -> usize {
        self.slots[slot].members.len()
    }

    /// Returns the items in the cluster at the given slot, in ascending order.
    ///
    /// # Panics
    ///
    /// * If the slot is out of bounds.
    #[must_use]
    pub fn members(&self, slot: usize) -> &[usize] {
        &self.slots[slot].members
    }

    /// Returns the dendrogram node id of the cluster at the given slot.
    ///
    /// # Panics
    ///
    /// * If the slot is out of bounds.
    #[must_use]
    pub fn node(&self, slot: usize) -> usize {
        self.slots[slot].node
    }

    /// Returns the slot of the cluster with the given node id, if it is active.
    #[must_use]
    pub fn position_of_node(&self, node: usize) -> Option<usize> {
        self.slots.iter().position(|s| s.node == node)
    }

    /// Returns the slot of the cluster that contains the given item.
    #[must_use]
    pub fn position_of_item(&self, item: usize) -> Option<usize> {
        self.slots.iter().position(|s| s.members.binary_search(&item).is_ok())
    }

    /// Merges the clusters at slots `i` and `j`, with `i > j`, into a new
    /// cluster with the given node id, which is appended as the last slot.
    ///
    /// # Returns
    ///
    /// The slot of the new cluster.
    ///
    /// # Errors
    ///
    /// * If `i <= j` or `i` is out of bounds.
    pub fn merge(&mut self, i: usize, j: usize, node: usize) -> Result<usize, ClusteringError> {
        let n = self.len();
        let (a, b) = take_pair(&mut self.slots, i, j).ok_or_else(|| {
            ClusteringError::invariant(format!("cannot merge slots ({i}, {j}) in a registry with {n} clusters"))
        })?;

        let mut members = a.members;
        members.extend(b.members);
        members.sort_unstable();
        self.slots.push(Slot { node, members });

        Ok(self.slots.len() - 1)
    }

    /// Returns the members of every active cluster, in slot order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Vec<usize>> {
        self.slots.iter().map(|s| s.members.clone()).collect()
    }

    /// Consumes the registry, returning the members of every active cluster in
    /// slot order.
    #[must_use]
    pub fn into_clusters(self) -> Vec<Vec<usize>> {
        self.slots.into_iter().map(|s| s.members).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ClusterRegistry;

    #[test]
    fn merges_keep_slot_order() {
        let mut registry = ClusterRegistry::new(5);
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.node(3), 3);

        let slot = registry.merge(3, 1, 5).unwrap();
        assert_eq!(slot, 3);
        assert_eq!(registry.snapshot(), vec![vec![0], vec![2], vec![4], vec![1, 3]]);
        assert_eq!(registry.cardinality(3), 2);
        assert_eq!(registry.node(3), 5);
        assert_eq!(registry.position_of_node(5), Some(3));
        assert_eq!(registry.position_of_node(1), None);
        assert_eq!(registry.position_of_item(3), Some(3));

        let slot = registry.merge(3, 0, 6).unwrap();
        assert_eq!(slot, 2);
        assert_eq!(registry.members(2), &[0, 1, 3]);
        assert_eq!(registry.into_clusters(), vec![vec![2], vec![4], vec![0, 1, 3]]);
    }

    #[test]
    fn rejects_bad_slots() {
        let mut registry = ClusterRegistry::new(3);
        assert!(registry.merge(0, 1, 3).is_err());
        assert!(registry.merge(3, 1, 3).is_err());
        assert_eq!(registry.len(), 3);
    }
}
