//! The `Metric` trait is used for all distance computations.

mod custom;
mod euclidean;
mod macros;
mod manhattan;
mod squared_euclidean;

pub use custom::Custom;
pub use euclidean::Euclidean;
pub use manhattan::Manhattan;
pub use squared_euclidean::SquaredEuclidean;

/// The `Metric` trait is used for all distance computations.
///
/// # Type Parameters
///
/// - `I`: The type of the items.
///
/// Distances are always `f64`, since the linkage recurrences mix them with
/// fractional cardinality weights.
///
/// # Example
///
/// The following is an example of a `Metric` implementation for the Hamming
/// distance between two sequences of bytes.
///
/// ```rust
/// use abd_hac::Metric;
///
/// struct Hamming;
///
/// impl<I: AsRef<[u8]>> Metric<I> for Hamming {
///     fn distance(&self, a: &I, b: &I) -> f64 {
///         let d = a.as_ref().iter().zip(b.as_ref()).filter(|(x, y)| x != y).count();
///         d as f64
///     }
///
///     fn name(&self) -> &str {
///         "hamming"
///     }
/// }
///
/// let a = b"hello";
/// let b = b"world";
///
/// assert_eq!(Hamming.distance(&a, &b), 4.0);
/// ```
pub trait Metric<I> {
    /// Call the metric on two items.
    fn distance(&self, a: &I, b: &I) -> f64;

    /// The name of the metric.
    fn name(&self) -> &str;
}

impl<I> Metric<I> for Box<dyn Metric<I>> {
    macros::impl_metric_block!();
}

impl<I, M: Metric<I>> Metric<I> for &M {
    macros::impl_metric_block!();
}
