//! Observers that are notified as the merge loop runs.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::Merge;
use crate::ClusterRegistry;

/// What an observer sees after each merge.
#[derive(Debug, Clone, Copy)]
pub struct MergeEvent<'a> {
    /// The 0-based index of the merge.
    pub step: usize,
    /// The merge that was just performed.
    pub merge: &'a Merge,
    /// The active clusters after the merge.
    pub registry: &'a ClusterRegistry,
}

/// A hook into the merge loop.
///
/// Observers only ever see the cluster registry, never the distance matrix,
/// so they cannot change the outcome of a build.
pub trait MergeObserver {
    /// Called once before the first merge.
    ///
    /// # Arguments
    ///
    /// * `cardinality` - The number of items being clustered.
    /// * `max_merges` - The number of merges needed to reach the target. The
    ///   build may stop before that.
    fn on_start(&mut self, cardinality: usize, max_merges: usize) {
        let _ = (cardinality, max_merges);
    }

    /// Called after every merge.
    fn observe(&mut self, event: &MergeEvent);
}

/// An observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl MergeObserver for NoObserver {
    fn observe(&mut self, _: &MergeEvent) {}
}

/// Adapts a closure into a `MergeObserver`.
///
/// ```
/// use abd_hac::{dendrogram::FnObserver, Agglomerative, Linkage};
///
/// let data = vec![[0.0], [1.0], [5.0]];
/// let mut distances = Vec::new();
/// let observer = FnObserver(|e: &abd_hac::dendrogram::MergeEvent| distances.push(e.merge.distance));
///
/// let _ = Agglomerative::new(Linkage::Single, 1)
///     .build_with_observer(&data, &abd_hac::metric::Euclidean, observer)
///     .unwrap();
/// assert_eq!(distances, vec![1.0, 4.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnObserver<F>(pub F);

impl<F: FnMut(&MergeEvent)> MergeObserver for FnObserver<F> {
    fn observe(&mut self, event: &MergeEvent) {
        (self.0)(event);
    }
}

impl<O: MergeObserver + ?Sized> MergeObserver for &mut O {
    fn on_start(&mut self, cardinality: usize, max_merges: usize) {
        (**self).on_start(cardinality, max_merges);
    }

    fn observe(&mut self, event: &MergeEvent) {
        (**self).observe(event);
    }
}

impl<O: MergeObserver> MergeObserver for Option<O> {
    fn on_start(&mut self, cardinality: usize, max_merges: usize) {
        if let Some(o) = self {
            o.on_start(cardinality, max_merges);
        }
    }

    fn observe(&mut self, event: &MergeEvent) {
        if let Some(o) = self {
            o.observe(event);
        }
    }
}

impl<A: MergeObserver, B: MergeObserver> MergeObserver for (A, B) {
    fn on_start(&mut self, cardinality: usize, max_merges: usize) {
        self.0.on_start(cardinality, max_merges);
        self.1.on_start(cardinality, max_merges);
    }

    fn observe(&mut self, event: &MergeEvent) {
        self.0.observe(event);
        self.1.observe(event);
    }
}

/// The partition of the data right after a merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The 0-based index of the merge.
    pub step: usize,
    /// The distance of the merge.
    pub distance: f64,
    /// The members of every active cluster, in slot order.
    pub clusters: Vec<Vec<usize>>,
}

/// Records a `Snapshot` of the partition after every merge.
///
/// With a depth of `k`, only the last `k` snapshots are kept: every merge is
/// captured and the oldest snapshot is dropped once there are more than `k`.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    /// The maximum number of snapshots to keep.
    depth: Option<usize>,
    /// The captured snapshots, oldest first.
    snapshots: VecDeque<Snapshot>,
}

impl HistoryRecorder {
    /// Creates a recorder that keeps every snapshot.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            depth: None,
            snapshots: VecDeque::new(),
        }
    }

    /// Creates a recorder that keeps the last `depth` snapshots.
    #[must_use]
    pub const fn last(depth: usize) -> Self {
        Self {
            depth: Some(depth),
            snapshots: VecDeque::new(),
        }
    }

    /// Returns the snapshots, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> &VecDeque<Snapshot> {
        &self.snapshots
    }

    /// Returns the snapshots, newest first.
    pub fn reversed(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter().rev()
    }

    /// Consumes the recorder, returning the snapshots oldest first.
    #[must_use]
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots.into()
    }
}

impl MergeObserver for HistoryRecorder {
    fn on_start(&mut self, _: usize, max_merges: usize) {
        self.snapshots.clear();
        self.snapshots.reserve(self.depth.map_or(max_merges, |k| k.min(max_merges)));
    }

    fn observe(&mut self, event: &MergeEvent) {
        self.snapshots.push_back(Snapshot {
            step: event.step,
            distance: event.merge.distance,
            clusters: event.registry.snapshot(),
        });
        if let Some(k) = self.depth {
            if self.snapshots.len() > k {
                self.snapshots.pop_front();
            }
        }
    }
}
