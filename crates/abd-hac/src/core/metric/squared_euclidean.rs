//! The `SquaredEuclidean` distance, the default metric.

use distances::Number;

use crate::Record;

use super::{macros::impl_numeric_metric, Metric};

/// The squared Euclidean distance.
///
/// This is the default metric. On `Record`s it only looks at the attributes
/// that are numeric in both records and ignores the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

/// The squared Euclidean distance between two numeric slices.
///
/// Elements are converted to `f64` before subtracting, so integer data
/// cannot overflow.
pub(crate) fn squared<T: Number>(a: &[T], b: &[T]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x.as_f64() - y.as_f64();
            d * d
        })
        .sum()
}

impl_numeric_metric!(SquaredEuclidean, "squared-euclidean", squared);

impl Metric<Record> for SquaredEuclidean {
    fn distance(&self, a: &Record, b: &Record) -> f64 {
        a.numeric_pairs(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    fn name(&self) -> &str {
        "squared-euclidean"
    }
}
