//! A named, user-supplied distance function.

use super::Metric;

/// A named, user-supplied distance function.
///
/// The function must be symmetric and non-negative.
#[derive(Clone)]
pub struct Custom<F> {
    /// The name of the metric.
    name: String,
    /// The distance function.
    f: F,
}

impl<F> Custom<F> {
    /// Wraps a distance function.
    pub fn new(name: &str, f: F) -> Self {
        Self {
            name: name.to_string(),
            f,
        }
    }
}

impl<I, F: Fn(&I, &I) -> f64> Metric<I> for Custom<F> {
    fn distance(&self, a: &I, b: &I) -> f64 {
        (self.f)(a, b)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
