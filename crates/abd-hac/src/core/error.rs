//! Errors that can occur while building or querying a hierarchy.

use thiserror::Error;

/// Errors that can occur while building or querying a hierarchy.
#[derive(Debug, Clone, PartialEq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ClusteringError {
    /// The dataset has too few points for any merge to happen.
    #[error("Insufficient data: at least 2 points are required, got {cardinality}")]
    TooFewPoints {
        /// The number of points in the dataset.
        cardinality: usize,
    },

    /// The requested number of clusters cannot be reached from this dataset.
    #[error("Invalid target: cannot produce {target} clusters from {cardinality} points")]
    InvalidTarget {
        /// The requested number of clusters.
        target: usize,
        /// The number of points in the dataset.
        cardinality: usize,
    },

    /// The maximum merge distance is negative or NaN.
    #[error("Invalid maximum distance: {0}")]
    InvalidMaxDistance(f64),

    /// A parameter other than the target or the cutoff is malformed.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what is wrong with the parameter.
        message: String,
    },

    /// The linkage cannot perform the requested operation.
    #[error("Unsupported operation: `{operation}` is not available for {linkage} linkage")]
    Unsupported {
        /// The name of the linkage strategy.
        linkage: String,
        /// The name of the operation.
        operation: &'static str,
    },

    /// The distance matrix and the cluster registry disagree. This is a bug.
    #[error("Internal invariant violated: {message}")]
    InvariantViolation {
        /// What went wrong.
        message: String,
    },
}

impl ClusteringError {
    /// Create a `TooFewPoints` error.
    #[must_use]
    pub const fn too_few_points(cardinality: usize) -> Self {
        Self::TooFewPoints { cardinality }
    }

    /// Create an `InvalidTarget` error.
    #[must_use]
    pub const fn invalid_target(target: usize, cardinality: usize) -> Self {
        Self::InvalidTarget { target, cardinality }
    }

    /// Create an `InvalidParameter` error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an `Unsupported` error.
    pub fn unsupported(linkage: impl Into<String>, operation: &'static str) -> Self {
        Self::Unsupported {
            linkage: linkage.into(),
            operation,
        }
    }

    /// Create an `InvariantViolation` error and log it.
    pub fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        ftlog::error!("Internal invariant violated: {message}");
        Self::InvariantViolation { message }
    }

    /// Whether the error was caused by invalid input rather than a bug.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::InvariantViolation { .. })
    }
}
