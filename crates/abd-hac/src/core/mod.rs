//! The core traits and structs for agglomerative clustering.

pub mod builder;
pub mod dataset;
pub mod dendrogram;
pub mod error;
pub mod linkage;
pub mod matrix;
pub mod metric;
pub mod partition;
pub mod registry;

pub use builder::{Agglomerative, HacParams, History};
pub use dataset::{Attribute, Dataset, Record};
pub use dendrogram::{Cut, Dendrogram, Merge, MergeObserver, Snapshot};
pub use error::ClusteringError;
pub use linkage::{Linkage, LinkageStrategy};
pub use matrix::DistanceMatrix;
pub use metric::Metric;
pub use partition::{Cluster, Partition};
pub use registry::ClusterRegistry;
