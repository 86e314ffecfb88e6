//! Traits for datasets that can be clustered.

mod record;

pub use record::{Attribute, Record};

use super::Metric;

/// A trait for datasets that can be clustered.
///
/// A dataset is an ordered, finite collection of items that can be indexed.
/// Each item is of type `I`, and distances between items are computed with a
/// [`Metric`]. The clustering engine only ever refers to items by their index
/// in the dataset, so the order of the items is significant: it decides how
/// ties between equally close pairs are broken.
///
/// We assume that the metric satisfies the following properties for all
/// items `x` and `y` in the dataset:
///
/// 1. Non-negativity: `M(x, y) >= 0`
/// 2. Symmetry: `M(x, y) == M(y, x)`
///
/// The triangle inequality is not required.
///
/// We provide a blanket implementation of this trait for any type that
/// implements `AsRef<[I]>`, i.e. any slice-like type. This allows us to use
/// standard Rust collections like `Vec<I>` as datasets out of the box.
pub trait Dataset<I> {
    /// Returns a reference to an indexed item from the dataset.
    ///
    /// The implementor may choose to panic if the index is out of bounds.
    fn get(&self, index: usize) -> &I;

    /// Returns the number of items in the dataset.
    fn cardinality(&self) -> usize;

    /// Whether the dataset has no items.
    fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    /// Returns the distance from a query item to the given indexed item.
    fn query_to_one<M: Metric<I>>(&self, query: &I, b: usize, metric: &M) -> f64 {
        metric.distance(query, self.get(b))
    }

    /// Returns the distances from a query item to all indexed items in the
    /// given slice.
    fn query_to_many<S: AsRef<[usize]>, M: Metric<I>>(&self, query: &I, b: S, metric: &M) -> Vec<(usize, f64)> {
        b.as_ref()
            .iter()
            .map(|&j| (j, self.query_to_one(query, j, metric)))
            .collect()
    }

    /// Computes the distance between two indexed items in the dataset.
    fn one_to_one<M: Metric<I>>(&self, a: usize, b: usize, metric: &M) -> f64 {
        self.query_to_one(self.get(a), b, metric)
    }

    /// Returns the strictly lower triangle of the pairwise distance matrix of
    /// the whole dataset.
    ///
    /// Row `i` holds the distances from item `i` to items `0..i`, so the first
    /// row is empty. Each pair is computed exactly once.
    fn lower_triangle<M: Metric<I>>(&self, metric: &M) -> Vec<Vec<f64>> {
        (0..self.cardinality())
            .map(|i| (0..i).map(|j| self.one_to_one(i, j, metric)).collect())
            .collect()
    }

    /// Returns references to the indexed items, in the given order.
    fn subset<S: AsRef<[usize]>>(&self, indices: S) -> Vec<&I> {
        indices.as_ref().iter().map(|&i| self.get(i)).collect()
    }
}

/// Blanket implementation of `Dataset` for any type that implements
/// `AsRef<[I]>`.
impl<I, D: AsRef<[I]>> Dataset<I> for D {
    fn get(&self, index: usize) -> &I {
        &self.as_ref()[index]
    }

    fn cardinality(&self) -> usize {
        self.as_ref().len()
    }
}
