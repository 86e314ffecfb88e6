//! Helpers shared by the integration tests.

#![allow(dead_code)]

pub mod data_gen;

use abd_hac::{Dendrogram, Partition};

/// Checks the structural invariants of a finished build.
pub fn check_partition(partition: &Partition, cardinality: usize) {
    assert_eq!(partition.cardinality(), cardinality);
    assert_eq!(partition.len() + partition.merge_count(), cardinality);

    let mut seen = vec![false; cardinality];
    for cluster in partition.clusters() {
        assert!(cluster.cardinality() > 0);
        assert!(cluster.indices().windows(2).all(|w| w[0] < w[1]), "indices are not ascending");
        for &i in cluster.indices() {
            assert!(!seen[i], "item {i} is in two clusters");
            seen[i] = true;
        }
    }
    assert!(seen.into_iter().all(|s| s), "some item is in no cluster");

    check_dendrogram(partition.dendrogram());
}

/// Checks that every merge joins two distinct, previously created nodes.
pub fn check_dendrogram(dendrogram: &Dendrogram) {
    let n = dendrogram.leaves();
    let mut used = vec![false; n + dendrogram.len()];
    for (step, m) in dendrogram.merges().iter().enumerate() {
        assert!(m.left < m.right);
        assert!(m.right < n + step, "merge {step} uses a node from the future");
        assert!(!used[m.left] && !used[m.right], "merge {step} reuses a node");
        used[m.left] = true;
        used[m.right] = true;
    }
}
