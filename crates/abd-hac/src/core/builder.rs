//! Configuration and the merge loop of an agglomerative build.

use core::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{
    dendrogram::{HistoryRecorder, MergeEvent, MergeObserver, NoObserver},
    metric::SquaredEuclidean,
    ClusterRegistry, ClusteringError, Dataset, Dendrogram, DistanceMatrix, Linkage, LinkageStrategy, Merge, Metric,
    Partition,
};

/// How much of the partition history a build records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum History {
    /// Record nothing beyond the merge list.
    #[default]
    Off,
    /// Record the partition after every merge.
    Full,
    /// Record the partition after each of the last `k` merges.
    Last(usize),
}

impl History {
    /// Returns the recorder for this setting, if any.
    const fn recorder(self) -> Option<HistoryRecorder> {
        match self {
            Self::Off => None,
            Self::Full => Some(HistoryRecorder::full()),
            Self::Last(k) => Some(HistoryRecorder::last(k)),
        }
    }
}

/// Plain parameters of a build, e.g. as read from a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HacParams {
    /// The linkage strategy.
    pub linkage: Linkage,
    /// The number of clusters at which to stop merging.
    pub target_clusters: usize,
    /// Stop merging once the closest pair is farther apart than this.
    pub max_distance: Option<f64>,
    /// How much of the partition history to record.
    pub history: History,
}

impl Default for HacParams {
    fn default() -> Self {
        Self {
            linkage: Linkage::default(),
            target_clusters: 1,
            max_distance: None,
            history: History::Off,
        }
    }
}

impl From<HacParams> for Agglomerative<Linkage> {
    fn from(params: HacParams) -> Self {
        Self::from_params(&params)
    }
}

/// The reason a build stopped merging.
#[derive(Debug, Clone, Copy)]
enum Stop {
    /// The requested number of clusters was reached.
    Target(usize),
    /// The closest pair was farther apart than the maximum distance.
    Cutoff(f64),
    /// Every remaining distance was NaN.
    NoFiniteDistance,
}

impl Display for Stop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Target(k) => write!(f, "reached {k} clusters"),
            Self::Cutoff(d) => write!(f, "closest pair at {d} exceeds the maximum distance"),
            Self::NoFiniteDistance => f.write_str("no finite distance remains"),
        }
    }
}

/// The phases of the merge loop.
#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Nothing has been merged yet.
    Initializing,
    /// Looking for the closest pair of clusters.
    Scanning,
    /// Merging the clusters in slots `i > j`.
    Merging {
        /// The larger slot.
        i: usize,
        /// The smaller slot.
        j: usize,
        /// The distance between the two clusters.
        distance: f64,
    },
    /// Merging has stopped.
    Finalizing(Stop),
}

/// Agglomerative hierarchical clustering.
///
/// Starting from one cluster per item, the two closest clusters are merged
/// repeatedly until the target number of clusters remains or, if a maximum
/// distance is set, until the closest pair is farther apart than it. After
/// each merge, the distances to the new cluster are derived from the old
/// ones by the linkage strategy `L`.
///
/// ```
/// use abd_hac::{metric::Euclidean, Agglomerative, Linkage};
///
/// let data = vec![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]];
/// let partition = Agglomerative::new(Linkage::Single, 2).build(&data, &Euclidean).unwrap();
///
/// assert_eq!(partition.labels(), vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Agglomerative<L: LinkageStrategy = Linkage> {
    /// The linkage strategy.
    linkage: L,
    /// The number of clusters at which to stop merging.
    target_clusters: usize,
    /// Stop merging once the closest pair is farther apart than this.
    max_distance: Option<f64>,
    /// How much of the partition history to record.
    history: History,
}

impl Agglomerative<Linkage> {
    /// Creates a builder from plain parameters.
    #[must_use]
    pub const fn from_params(params: &HacParams) -> Self {
        Self {
            linkage: params.linkage,
            target_clusters: params.target_clusters,
            max_distance: params.max_distance,
            history: params.history,
        }
    }

    /// Returns the plain parameters of this builder.
    #[must_use]
    pub const fn params(&self) -> HacParams {
        HacParams {
            linkage: self.linkage,
            target_clusters: self.target_clusters,
            max_distance: self.max_distance,
            history: self.history,
        }
    }
}

impl<L: LinkageStrategy + Clone> Agglomerative<L> {
    /// Creates a new builder.
    ///
    /// # Arguments
    ///
    /// * `linkage`: the strategy used to derive distances to merged clusters.
    /// * `target_clusters`: the number of clusters at which to stop merging.
    #[must_use]
    pub const fn new(linkage: L, target_clusters: usize) -> Self {
        Self {
            linkage,
            target_clusters,
            max_distance: None,
            history: History::Off,
        }
    }

    /// Stops merging once the closest pair of clusters is farther apart than
    /// `max_distance`, even if more than the target number of clusters remain.
    #[must_use]
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// Sets how much of the partition history to record.
    #[must_use]
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// Returns the linkage strategy.
    pub const fn linkage(&self) -> &L {
        &self.linkage
    }

    /// Returns the number of clusters at which merging stops.
    pub const fn target_clusters(&self) -> usize {
        self.target_clusters
    }

    /// Returns the maximum merge distance, if any.
    pub const fn max_distance(&self) -> Option<f64> {
        self.max_distance
    }

    /// Returns the history setting.
    pub const fn history(&self) -> History {
        self.history
    }

    /// Checks the configuration against the number of items to cluster.
    ///
    /// # Errors
    ///
    /// * If there are fewer than 2 items.
    /// * If the target is 0 or greater than the number of items.
    /// * If the maximum distance is negative or NaN.
    /// * If the history depth is 0.
    pub fn validate(&self, cardinality: usize) -> Result<(), ClusteringError> {
        if cardinality < 2 {
            return Err(ClusteringError::too_few_points(cardinality));
        }
        if self.target_clusters == 0 || self.target_clusters > cardinality {
            return Err(ClusteringError::invalid_target(self.target_clusters, cardinality));
        }
        if let Some(d) = self.max_distance {
            if d.is_nan() || d < 0.0 {
                return Err(ClusteringError::InvalidMaxDistance(d));
            }
        }
        if self.history == History::Last(0) {
            return Err(ClusteringError::invalid_parameter("history depth must be positive"));
        }
        Ok(())
    }

    /// Clusters a dataset.
    ///
    /// # Errors
    ///
    /// * If the configuration is invalid for the dataset. See
    ///   [`Agglomerative::validate`].
    /// * If an internal invariant is violated. This is a bug.
    pub fn build<I, D: Dataset<I>, M: Metric<I>>(&self, data: &D, metric: &M) -> Result<Partition<L>, ClusteringError> {
        self.build_with_observer(data, metric, NoObserver)
    }

    /// Clusters a dataset with the default squared Euclidean metric.
    ///
    /// # Errors
    ///
    /// See [`Agglomerative::build`].
    pub fn build_default<I, D: Dataset<I>>(&self, data: &D) -> Result<Partition<L>, ClusteringError>
    where
        SquaredEuclidean: Metric<I>,
    {
        self.build(data, &SquaredEuclidean)
    }

    /// Clusters a dataset, notifying an observer after every merge.
    ///
    /// # Errors
    ///
    /// See [`Agglomerative::build`].
    pub fn build_with_observer<I, D: Dataset<I>, M: Metric<I>, O: MergeObserver>(
        &self,
        data: &D,
        metric: &M,
        observer: O,
    ) -> Result<Partition<L>, ClusteringError> {
        self.validate(data.cardinality())?;
        ftlog::info!(
            "Building {} linkage over {} items with the {} metric, targeting {} clusters.",
            self.linkage.name(),
            data.cardinality(),
            metric.name(),
            self.target_clusters
        );
        let matrix = DistanceMatrix::new(data, metric)?;
        self.run(matrix, observer)
    }

    /// Clusters items whose pairwise distances have already been computed.
    ///
    /// # Errors
    ///
    /// See [`Agglomerative::build`].
    pub fn build_from_matrix(&self, matrix: DistanceMatrix) -> Result<Partition<L>, ClusteringError> {
        self.validate(matrix.len())?;
        ftlog::info!(
            "Building {} linkage over a precomputed matrix of {} items, targeting {} clusters.",
            self.linkage.name(),
            matrix.len(),
            self.target_clusters
        );
        self.run(matrix, NoObserver)
    }

    /// Runs the merge loop to completion.
    fn run<O: MergeObserver>(&self, mut matrix: DistanceMatrix, observer: O) -> Result<Partition<L>, ClusteringError> {
        let cardinality = matrix.len();
        let mut registry = ClusterRegistry::new(cardinality);
        let mut dendrogram = Dendrogram::new(cardinality);
        let mut observers = (observer, self.history.recorder());

        let mut phase = Phase::Initializing;
        let stop = loop {
            phase = match phase {
                Phase::Initializing => {
                    observers.on_start(cardinality, cardinality - self.target_clusters);
                    Phase::Scanning
                }
                Phase::Scanning => self.scan(&matrix),
                Phase::Merging { i, j, distance } => {
                    let step = dendrogram.len();
                    let merge = self.merge(&mut matrix, &mut registry, (i, j), distance, cardinality + step)?;
                    ftlog::debug!(
                        "Merge {step}: nodes {} and {} at distance {distance}, {} clusters remain.",
                        merge.left,
                        merge.right,
                        registry.len()
                    );
                    observers.observe(&MergeEvent {
                        step,
                        merge: &merge,
                        registry: &registry,
                    });
                    dendrogram.push(merge);
                    Phase::Scanning
                }
                Phase::Finalizing(stop) => break stop,
            };
        };

        // Classification uses item-level distances, so the matrix is not kept.
        drop(matrix);
        ftlog::info!(
            "Stopped after {} merges with {} clusters: {stop}.",
            dendrogram.len(),
            registry.len()
        );

        let (_, recorder) = observers;
        Ok(Partition::new(
            registry.into_clusters(),
            dendrogram,
            recorder.map(HistoryRecorder::into_snapshots),
            self.linkage.clone(),
        ))
    }

    /// Decides whether to stop or which pair to merge next.
    fn scan(&self, matrix: &DistanceMatrix) -> Phase {
        if matrix.len() <= self.target_clusters {
            return Phase::Finalizing(Stop::Target(matrix.len()));
        }
        match matrix.closest_pair() {
            None => {
                ftlog::warn!("No finite distance remains between {} clusters.", matrix.len());
                Phase::Finalizing(Stop::NoFiniteDistance)
            }
            Some((_, _, distance)) if self.max_distance.is_some_and(|t| distance > t) => {
                Phase::Finalizing(Stop::Cutoff(distance))
            }
            Some((i, j, distance)) => Phase::Merging { i, j, distance },
        }
    }

    /// Merges the clusters in slots `i > j` in both the matrix and the
    /// registry. The new cluster gets the given node id.
    fn merge(
        &self,
        matrix: &mut DistanceMatrix,
        registry: &mut ClusterRegistry,
        (i, j): (usize, usize),
        distance: f64,
        node: usize,
    ) -> Result<Merge, ClusteringError> {
        if matrix.len() != registry.len() {
            return Err(ClusteringError::invariant(format!(
                "the matrix has {} clusters but the registry has {}",
                matrix.len(),
                registry.len()
            )));
        }

        let (n_i, n_j) = (registry.cardinality(i), registry.cardinality(j));
        let new_row = (0..matrix.len())
            .filter(|&x| x != i && x != j)
            .map(|x| {
                self.linkage
                    .linkage_distance(matrix.read(x, i), matrix.read(x, j), distance, n_i, n_j, registry.cardinality(x))
            })
            .collect::<Vec<_>>();

        let merge = Merge::new(registry.node(i), registry.node(j), distance, n_i + n_j);

        let m_slot = matrix.apply_merge(i, j, &new_row)?;
        let r_slot = registry.merge(i, j, node)?;
        if m_slot == r_slot {
            Ok(merge)
        } else {
            Err(ClusteringError::invariant(format!(
                "the merged cluster is in slot {m_slot} of the matrix but in slot {r_slot} of the registry"
            )))
        }
    }
}
