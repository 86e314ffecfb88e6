//! Utility functions for the crate.

use core::cmp::Ordering;

/// Return the index and value of the minimum value in the given slice of values.
///
/// NAN values are ordered as greater than all other values. Among equal
/// values, the first one wins.
///
/// This will return `None` if the given slice is empty.
pub fn arg_min<T: PartialOrd + Copy>(values: &[T]) -> Option<(usize, T)> {
    values
        .iter()
        .enumerate()
        .min_by(|&(_, l), &(_, r)| nan_last(l, r))
        .map(|(i, v)| (i, *v))
}

/// Compares two values, ordering incomparable (NAN) values after all others.
fn nan_last<T: PartialOrd>(l: &T, r: &T) -> Ordering {
    l.partial_cmp(r).unwrap_or_else(|| {
        if l.partial_cmp(l).is_none() {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    })
}

/// Return the mean value of the given slice of values, or `None` if it is empty.
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Removes the items at positions `i` and `j` from `items`, with `i > j`,
/// returning them as `(items[i], items[j])`.
///
/// Every item after `j` shifts left by one position and every item after `i`
/// shifts left by two. This is the only place where cluster slots are
/// re-indexed; the distance matrix and the cluster registry both go through
/// it so that they always agree on slot positions.
///
/// Returns `None`, leaving `items` untouched, if `i <= j` or `i` is out of
/// bounds.
pub fn take_pair<T>(items: &mut Vec<T>, i: usize, j: usize) -> Option<(T, T)> {
    if i <= j || i >= items.len() {
        return None;
    }
    // `i` first, so that `j` still points at the right item.
    let item_i = items.remove(i);
    let item_j = items.remove(j);
    Some((item_i, item_j))
}

/// Maps a slot position from before a `take_pair(_, i, j)` to its position
/// after, or `None` if the slot was one of the two removed.
#[must_use]
pub const fn shifted_slot(slot: usize, i: usize, j: usize) -> Option<usize> {
    if slot == i || slot == j {
        None
    } else if slot > i {
        Some(slot - 2)
    } else if slot > j {
        Some(slot - 1)
    } else {
        Some(slot)
    }
}
