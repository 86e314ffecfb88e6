//! The `Manhattan` distance metric.

use distances::Number;

use crate::Record;

use super::{macros::impl_numeric_metric, Metric};

/// The `Manhattan` distance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

/// The Manhattan distance between two numeric slices.
fn manhattan<T: Number>(a: &[T], b: &[T]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x.as_f64() - y.as_f64()).abs()).sum()
}

impl_numeric_metric!(Manhattan, "manhattan", manhattan);

impl Metric<Record> for Manhattan {
    fn distance(&self, a: &Record, b: &Record) -> f64 {
        a.numeric_pairs(b).map(|(x, y)| (x - y).abs()).sum()
    }

    fn name(&self) -> &str {
        "manhattan"
    }
}
