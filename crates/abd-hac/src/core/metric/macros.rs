//! Some macros for implementing `Metric`.

/// Implements `Metric` for a smart pointer or reference.
macro_rules! impl_metric_block {
    () => {
        fn distance(&self, a: &I, b: &I) -> f64 {
            (**self).distance(a, b)
        }

        fn name(&self) -> &str {
            (**self).name()
        }
    };
}

/// Implements `Metric` for numeric vectors and arrays with the given kernel.
///
/// The kernel is a function `fn(&[T], &[T]) -> f64` for `T: Number`.
macro_rules! impl_numeric_metric {
    ($metric:ty, $name:literal, $kernel:ident) => {
        impl<T: distances::Number> $crate::metric::Metric<Vec<T>> for $metric {
            fn distance(&self, a: &Vec<T>, b: &Vec<T>) -> f64 {
                $kernel(a.as_slice(), b.as_slice())
            }

            fn name(&self) -> &str {
                $name
            }
        }

        impl<T: distances::Number, const N: usize> $crate::metric::Metric<[T; N]> for $metric {
            fn distance(&self, a: &[T; N], b: &[T; N]) -> f64 {
                $kernel(a.as_slice(), b.as_slice())
            }

            fn name(&self) -> &str {
                $name
            }
        }
    };
}

pub(crate) use impl_metric_block;
pub(crate) use impl_numeric_metric;
