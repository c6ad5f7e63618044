//! Held-out evaluation metrics.

use ksp_model::Outcome;
use linfa::prelude::ToConfusionMatrix;
use ndarray::Array1;
use rkyv::{Archive, Deserialize, Serialize};

use crate::error::{Result, TrainError};

/// Confusion counts with [`Outcome::Successful`] as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: u64,
    pub false_positive: u64,
    pub true_negative: u64,
    pub false_negative: u64,
}

impl ConfusionCounts {
    /// Tally predictions against the true labels, pairwise.
    pub fn tally(truth: &[Outcome], predicted: &[Outcome]) -> Self {
        let mut counts = Self::default();
        for (actual, guess) in truth.iter().zip(predicted) {
            match (actual, guess) {
                (Outcome::Successful, Outcome::Successful) => counts.true_positive += 1,
                (Outcome::Failed, Outcome::Successful) => counts.false_positive += 1,
                (Outcome::Failed, Outcome::Failed) => counts.true_negative += 1,
                (Outcome::Successful, Outcome::Failed) => counts.false_negative += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Binary F1 of the successful class; 0 when it is never predicted or seen.
    pub fn f1(&self) -> f64 {
        let denominator = 2 * self.true_positive + self.false_positive + self.false_negative;
        if denominator == 0 {
            0.0
        } else {
            (2 * self.true_positive) as f64 / denominator as f64
        }
    }
}

/// Accuracy and binary F1 on the test partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Archive, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub f1: f64,
    pub confusion: ConfusionCounts,
}

impl EvaluationMetrics {
    /// Score predictions. An empty test partition scores 0 throughout.
    ///
    /// Accuracy comes from linfa's confusion matrix. F1 is taken from the
    /// tallied counts because linfa's binary scores treat whichever label the
    /// matrix happens to list first as positive.
    pub fn from_predictions(truth: &[Outcome], predicted: &[Outcome]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(TrainError::InconsistentModel(format!(
                "{} labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }
        let confusion = ConfusionCounts::tally(truth, predicted);
        if truth.is_empty() {
            return Ok(Self::default());
        }

        let matrix = label_array(predicted)
            .confusion_matrix(label_array(truth).view())
            .map_err(|err| TrainError::InconsistentModel(err.to_string()))?;
        Ok(Self {
            accuracy: f64::from(matrix.accuracy()),
            f1: confusion.f1(),
            confusion,
        })
    }
}

fn label_array(outcomes: &[Outcome]) -> Array1<usize> {
    outcomes
        .iter()
        .map(|outcome| usize::from(outcome.label()))
        .collect()
}
