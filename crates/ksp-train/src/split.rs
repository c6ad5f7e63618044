//! Seeded train/test split.

use ksp_model::Outcome;
use linfa::prelude::Dataset;
use ndarray::{Array1, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Row positions assigned to each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle the rows labelled by `labels` with `seed` and hold out
/// `ceil(test_fraction * rows)` of them.
///
/// The dataset shuffled here carries row positions as its single feature,
/// so the split is decided before any encoder sees the rows. The first
/// positions of the permutation form the test partition. The cut is made
/// on the exact row count rather than through `split_with_ratio`, whose
/// `f32` ratio can round one row across the boundary.
pub fn split_indices(labels: &[Outcome], test_fraction: f64, seed: u64) -> TrainTestSplit {
    let rows = labels.len();
    let positions = Array1::from_iter(0..rows).insert_axis(Axis(1));
    let targets = Array1::from_iter(labels.iter().map(|label| usize::from(label.label())));
    let dataset = Dataset::new(positions, targets);

    let mut rng = StdRng::seed_from_u64(seed);
    let shuffled = dataset.shuffle(&mut rng);
    let order = shuffled.records().column(0).to_vec();

    let (test, train) = order.split_at(test_size(rows, test_fraction));
    TrainTestSplit {
        train: train.to_vec(),
        test: test.to_vec(),
    }
}

fn test_size(rows: usize, test_fraction: f64) -> usize {
    let raw = (test_fraction * rows as f64).ceil();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(rows)
    }
}
