#![deny(clippy::correctness)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::nursery,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::cast_lossless
)]
#![doc = include_str!("../README.md")]

mod core;
pub mod utils;

pub use crate::core::{
    builder, dataset, dendrogram, error, linkage, matrix, metric, partition, registry, Agglomerative, Attribute,
    Cluster, ClusterRegistry, ClusteringError, Cut, Dataset, Dendrogram, DistanceMatrix, HacParams, History,
    Linkage, LinkageStrategy, Merge, MergeObserver, Metric, Partition, Record, Snapshot,
};

/// The current version of the crate.
pub const VERSION: &str = "0.1.0";
