//! A compact, incrementally updated matrix of distances between clusters.

use super::{ClusteringError, Dataset, Metric};
use crate::utils::take_pair;

/// The strictly lower-triangular matrix of distances between the active
/// clusters.
///
/// Clusters are addressed by their *slot*, i.e. their position in the list of
/// active clusters. Slots shift whenever a merge removes two clusters, so the
/// matrix does not store rows by slot. Instead, every cluster owns a stable
/// *handle* into an arena of triangular rows, and the matrix keeps the
/// slot-to-handle mapping. Removing two slots only touches that mapping, and a
/// merged cluster reuses the handle of one of its parents, so a merge costs
/// `O(n)` in the number of active clusters and never moves stored distances.
///
/// The distance from a slot to itself is zero and is never stored.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    /// `cells[h]` holds the distances from handle `h` to handles `0..h`.
    cells: Vec<Vec<f64>>,
    /// The handle of the cluster in each active slot.
    handles: Vec<usize>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances between the items of a dataset.
    ///
    /// This is the only time the metric is called.
    ///
    /// # Errors
    ///
    /// * If the dataset has fewer than 2 items.
    pub fn new<I, D: Dataset<I>, M: Metric<I>>(data: &D, metric: &M) -> Result<Self, ClusteringError> {
        let cardinality = data.cardinality();
        if cardinality < 2 {
            return Err(ClusteringError::too_few_points(cardinality));
        }
        ftlog::debug!(
            "Computing {} pairwise distances with the {} metric.",
            cardinality * (cardinality - 1) / 2,
            metric.name()
        );
        Self::from_lower_triangle(data.lower_triangle(metric))
    }

    /// Creates a matrix from precomputed distances.
    ///
    /// Row `i` must hold the distances from item `i` to items `0..i`.
    ///
    /// # Errors
    ///
    /// * If there are fewer than 2 rows.
    /// * If row `i` does not have exactly `i` entries.
    /// * If any distance is negative or NaN.
    pub fn from_lower_triangle(rows: Vec<Vec<f64>>) -> Result<Self, ClusteringError> {
        if rows.len() < 2 {
            return Err(ClusteringError::too_few_points(rows.len()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(i, row)| row.len() != *i) {
            return Err(ClusteringError::invalid_parameter(format!(
                "row {i} of a lower-triangular matrix must have {i} entries, found {}",
                row.len()
            )));
        }
        if let Some(d) = rows.iter().flatten().find(|d| d.is_nan() || **d < 0.0) {
            return Err(ClusteringError::invalid_parameter(format!(
                "distances must be non-negative, found {d}"
            )));
        }

        let handles = (0..rows.len()).collect();
        Ok(Self { cells: rows, handles })
    }

    /// Returns the number of active clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether there are no active clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns the distance between the clusters in slots `a` and `b`.
    ///
    /// The order of the arguments does not matter, and `read(a, a)` is zero.
    ///
    /// # Panics
    ///
    /// * If either slot is out of bounds. This is a programming error.
    #[must_use]
    pub fn read(&self, a: usize, b: usize) -> f64 {
        self.try_read(a, b).unwrap_or_else(|| {
            unreachable!(
                "Slots ({a}, {b}) are out of bounds for a matrix with {} active clusters.",
                self.len()
            )
        })
    }

    /// Returns the distance between the clusters in slots `a` and `b`, or
    /// `None` if either slot is out of bounds.
    #[must_use]
    pub fn try_read(&self, a: usize, b: usize) -> Option<f64> {
        let (&ha, &hb) = (<[usize]>::get(&self.handles, a)?, <[usize]>::get(&self.handles, b)?);
        Some(if a == b { 0.0 } else { self.cell(ha, hb) })
    }

    /// Returns the distances from slot `a` to every active slot, in slot order.
    ///
    /// # Panics
    ///
    /// * If `a` is out of bounds. This is a programming error.
    #[must_use]
    pub fn row(&self, a: usize) -> Vec<f64> {
        (0..self.len()).map(|b| self.read(a, b)).collect()
    }

    /// Finds the closest pair of active clusters.
    ///
    /// Pairs are scanned row by row in ascending order and, within a row,
    /// column by column in ascending order. The first pair with the smallest
    /// distance wins, so ties are broken deterministically. NaN distances are
    /// never selected.
    ///
    /// # Returns
    ///
    /// `(i, j, d)` with `i > j`, or `None` if there are fewer than two active
    /// clusters or every distance is NaN.
    #[must_use]
    pub fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let mut closest: Option<(usize, usize, f64)> = None;
        for (i, &hi) in self.handles.iter().enumerate().skip(1) {
            for (j, &hj) in self.handles.iter().enumerate().take(i) {
                let d = self.cell(hi, hj);
                if closest.map_or(!d.is_nan(), |(_, _, best)| d < best) {
                    closest = Some((i, j, d));
                }
            }
        }
        closest
    }

    /// Replaces the clusters in slots `i` and `j` with their union.
    ///
    /// The rows and columns of `i` and `j` are removed, the remaining slots
    /// shift down to close the gaps, and the new cluster is appended in the
    /// last slot.
    ///
    /// # Arguments
    ///
    /// * `i` - The larger of the two slots.
    /// * `j` - The smaller of the two slots.
    /// * `new_row` - The distances from every surviving cluster to the new
    ///   cluster, in the order of the surviving slots.
    ///
    /// # Returns
    ///
    /// The slot of the new cluster.
    ///
    /// # Errors
    ///
    /// * If `i <= j` or `i` is out of bounds.
    /// * If `new_row` does not have one entry per surviving cluster.
    ///
    /// Both are bugs in the caller and are reported as invariant violations.
    pub fn apply_merge(&mut self, i: usize, j: usize, new_row: &[f64]) -> Result<usize, ClusteringError> {
        let n = self.len();
        if new_row.len() + 2 != n {
            return Err(ClusteringError::invariant(format!(
                "a merge in a matrix with {n} active clusters needs {} new distances, got {}",
                n.saturating_sub(2),
                new_row.len()
            )));
        }
        let (_, hj) = take_pair(&mut self.handles, i, j).ok_or_else(|| {
            ClusteringError::invariant(format!("cannot merge slots ({i}, {j}) in a matrix with {n} active clusters"))
        })?;

        // The row of the freed handle is overwritten in place; the other
        // freed handle is simply forgotten.
        let Self { cells, handles } = self;
        for (&hx, &d) in handles.iter().zip(new_row) {
            set_cell(cells, hj, hx, d);
        }
        handles.push(hj);

        Ok(handles.len() - 1)
    }

    /// Returns the distance stored between two distinct handles.
    fn cell(&self, ha: usize, hb: usize) -> f64 {
        if ha > hb {
            self.cells[ha][hb]
        } else {
            self.cells[hb][ha]
        }
    }

}

/// Stores the distance between two distinct handles.
fn set_cell(cells: &mut [Vec<f64>], ha: usize, hb: usize, d: f64) {
    if ha > hb {
        cells[ha][hb] = d;
    } else {
        cells[hb][ha] = d;
    }
}
