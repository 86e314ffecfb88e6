//! The `Euclidean` distance metric.

use distances::Number;

use crate::Record;

use super::{macros::impl_numeric_metric, squared_euclidean::squared, Metric};

/// The `Euclidean` distance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

/// The Euclidean distance between two numeric slices.
fn euclidean<T: Number>(a: &[T], b: &[T]) -> f64 {
    squared(a, b).sqrt()
}

impl_numeric_metric!(Euclidean, "euclidean", euclidean);

impl Metric<Record> for Euclidean {
    fn distance(&self, a: &Record, b: &Record) -> f64 {
        a.numeric_pairs(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
    }

    fn name(&self) -> &str {
        "euclidean"
    }
}
