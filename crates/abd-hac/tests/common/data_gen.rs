//! Data generation utilities for testing.

use abd_hac::{Attribute, Record};
use rand::prelude::*;

/// Two tight pairs far apart from each other.
pub fn two_pairs() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]]
}

pub fn line(max: i32) -> Vec<[f64; 1]> {
    (-max..=max).map(|x| [f64::from(x)]).collect()
}

/// Random points in a box.
pub fn tabular(car: usize, dim: usize, min: f64, max: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..car)
        .map(|_| (0..dim).map(|_| rng.gen_range(min..max)).collect())
        .collect()
}

/// `per_blob` random points around each of the given centers.
///
/// The points are interleaved so that members of one blob are never
/// adjacent in the dataset.
pub fn blobs(centers: &[[f64; 2]], per_blob: usize, spread: f64, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..per_blob)
        .flat_map(|_| centers.iter().copied().collect::<Vec<_>>())
        .map(|[x, y]| [x + rng.gen_range(-spread..spread), y + rng.gen_range(-spread..spread)])
        .collect()
}

/// Records with a categorical attribute between two numeric ones.
pub fn records() -> Vec<Record> {
    [(0.0, "red", 0.0), (0.0, "blue", 1.0), (4.0, "red", 4.0), (4.0, "green", 5.0)]
        .into_iter()
        .map(|(a, c, b)| Record::new(vec![Attribute::from(a), Attribute::from(c), Attribute::from(b)]))
        .collect()
}
