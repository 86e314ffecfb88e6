//! Tests of the merge tree and the snapshot history.

use abd_hac::{
    metric::{Custom, Euclidean, SquaredEuclidean},
    Agglomerative, Cut, HacParams, History, Linkage, Partition,
};
use test_case::test_case;

mod common;

fn indices(partition: &Partition) -> Vec<Vec<usize>> {
    partition.clusters().iter().map(|c| c.indices().to_vec()).collect()
}

#[test_case(Linkage::Single; "single")]
#[test_case(Linkage::Complete; "complete")]
#[test_case(Linkage::Average; "average")]
#[test_case(Linkage::Weighted; "weighted")]
#[test_case(Linkage::Centroid; "centroid")]
#[test_case(Linkage::Median; "median")]
#[test_case(Linkage::Ward; "ward")]
fn cut_matches_build(linkage: Linkage) {
    let data = common::data_gen::tabular(40, 2, -3.0, 3.0, 17);
    let full = Agglomerative::new(linkage, 1).build_default(&data).unwrap();
    common::check_dendrogram(full.dendrogram());
    assert_eq!(full.dendrogram().roots(), 1);

    for k in [1, 2, 5, 13, 39, 40] {
        let partition = Agglomerative::new(linkage, k).build_default(&data).unwrap();
        assert_eq!(full.dendrogram().cut(Cut::Clusters(k)).unwrap(), indices(&partition), "k = {k}");
        assert_eq!(full.dendrogram().labels(Cut::Clusters(k)).unwrap(), partition.labels());
    }
}

#[test_case(Linkage::Single; "single")]
#[test_case(Linkage::Complete; "complete")]
#[test_case(Linkage::Median; "median")]
fn distance_cut_matches_cutoff(linkage: Linkage) {
    let data = common::data_gen::tabular(50, 3, 0.0, 10.0, 5);
    let full = Agglomerative::new(linkage, 1).build(&data, &Euclidean).unwrap();

    let mut distances = full.dendrogram().merges().iter().map(|m| m.distance).collect::<Vec<_>>();
    distances.sort_by(f64::total_cmp);
    let t = distances[distances.len() / 2];

    let cut = Agglomerative::new(linkage, 1)
        .with_max_distance(t)
        .build(&data, &Euclidean)
        .unwrap();
    assert_eq!(full.dendrogram().cut(Cut::Distance(t)).unwrap(), indices(&cut));
    assert!(full.dendrogram().merges().starts_with(cut.dendrogram().merges()));
}

#[test]
fn cut_beyond_early_stop() {
    let data = common::data_gen::line(5);
    let partition = Agglomerative::new(Linkage::Single, 4).build(&data, &Euclidean).unwrap();
    let dendrogram = partition.dendrogram();

    assert_eq!(dendrogram.roots(), 4);
    assert!(dendrogram.cut(Cut::Clusters(4)).is_ok());
    assert!(dendrogram.cut(Cut::Clusters(3)).is_err());
    assert!(dendrogram.cut(Cut::Clusters(0)).is_err());
    assert!(dendrogram.cut(Cut::Distance(-1.0)).is_err());
    assert_eq!(dendrogram.cut(Cut::Distance(100.0)).unwrap(), indices(&partition));
}

#[test]
fn leaf_order_and_linkage_matrix() {
    let data = common::data_gen::two_pairs();
    let partition = Agglomerative::new(Linkage::Complete, 1).build(&data, &Euclidean).unwrap();
    let dendrogram = partition.dendrogram();

    assert_eq!(dendrogram.leaf_order().unwrap(), vec![0, 1, 2, 3]);

    let rows = dendrogram.linkage_matrix();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], [0.0, 1.0, 1.0, 2.0]);
    assert_eq!(rows[1], [2.0, 3.0, 1.0, 2.0]);
    assert_eq!((rows[2][0], rows[2][1], rows[2][3]), (4.0, 5.0, 4.0));

    let data = common::data_gen::tabular(25, 2, 0.0, 1.0, 9);
    let partition = Agglomerative::new(Linkage::Average, 3).build(&data, &Euclidean).unwrap();
    let mut order = partition.dendrogram().leaf_order().unwrap();
    order.sort_unstable();
    assert_eq!(order, (0..25).collect::<Vec<_>>());
}

#[test]
fn centroid_inverts() {
    // An equilateral triangle: the centroid of any two corners is closer to
    // the third corner than the corners are to each other.
    let data = vec![[0.0, 0.0], [1.0, 0.0], [0.5, 0.75_f64.sqrt()]];
    for linkage in [Linkage::Centroid, Linkage::Median] {
        let partition = Agglomerative::new(linkage, 1).build(&data, &SquaredEuclidean).unwrap();
        assert_eq!(partition.dendrogram().inversions(), vec![1], "{linkage}");
        assert!(!partition.dendrogram().is_monotonic());
    }
}

#[test]
fn full_history() {
    let data = common::data_gen::tabular(20, 2, 0.0, 1.0, 1);
    let partition = Agglomerative::new(Linkage::Average, 2)
        .with_history(History::Full)
        .build(&data, &Euclidean)
        .unwrap();

    let history = partition.history().unwrap();
    assert_eq!(history.len(), partition.merge_count());
    for (step, snapshot) in history.iter().enumerate() {
        assert_eq!(snapshot.step, step);
        assert_eq!(snapshot.clusters.len(), 20 - step - 1);
        assert_eq!(snapshot.distance, partition.dendrogram().merges()[step].distance);
    }
    assert_eq!(history.last().map(|s| s.clusters.clone()), Some(indices(&partition)));

    let newest = partition.history_newest_first().unwrap().next().unwrap();
    assert_eq!(newest.step, 17);
}

#[test]
fn last_k_history() {
    let data = common::data_gen::tabular(20, 2, 0.0, 1.0, 2);
    let full = Agglomerative::new(Linkage::Single, 1)
        .with_history(History::Full)
        .build(&data, &Euclidean)
        .unwrap();
    let last = Agglomerative::new(Linkage::Single, 1)
        .with_history(History::Last(3))
        .build(&data, &Euclidean)
        .unwrap();

    let full = full.history().unwrap();
    assert_eq!(last.history().unwrap(), &full[16..]);

    // A build that stops early on the cutoff still keeps the last 3 merges.
    let t = full[10].distance;
    let early = Agglomerative::new(Linkage::Single, 1)
        .with_max_distance(t)
        .with_history(History::Last(3))
        .build(&data, &Euclidean)
        .unwrap();
    let steps = early.history().unwrap().iter().map(|s| s.step).collect::<Vec<_>>();
    let performed = early.merge_count();
    assert_eq!(steps, (performed - 3..performed).collect::<Vec<_>>());

    let off = Agglomerative::new(Linkage::Single, 1).build(&data, &Euclidean).unwrap();
    assert!(off.history().is_none());
}

#[test]
fn last_k_history_after_nan_stop() {
    let data = vec![[0.0], [1.0], [2.0]];
    let metric = Custom::new("infinite", |_: &[f64; 1], _: &[f64; 1]| f64::INFINITY);

    // The centroid update after the first merge is NaN, so only one of the
    // two possible merges happens.
    let partition = Agglomerative::new(Linkage::Centroid, 1)
        .with_history(History::Last(1))
        .build(&data, &metric)
        .unwrap();
    assert_eq!(partition.merge_count(), 1);

    let history = partition.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].step, 0);
    assert_eq!(history[0].clusters.len(), 2);
}

#[test]
fn serialization() {
    let data = common::data_gen::two_pairs();
    let partition = Agglomerative::new(Linkage::Weighted, 2)
        .with_history(History::Full)
        .build(&data, &Euclidean)
        .unwrap();

    let bytes = bincode::serialize(&partition).unwrap();
    let restored: Partition = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, partition);

    let params = HacParams {
        linkage: Linkage::Ward,
        target_clusters: 3,
        max_distance: None,
        history: History::Last(2),
    };
    let bytes = bincode::serialize(&params).unwrap();
    assert_eq!(bincode::deserialize::<HacParams>(&bytes).unwrap(), params);
}
