//! k-nearest-neighbours classifier over encoded feature rows.
//!
//! Neighbours come from a `linfa-nn` linear search under Euclidean
//! distance and every neighbour gets one vote. A tied vote resolves to
//! [`Outcome::Failed`].

use ksp_model::Outcome;
use linfa_nn::distance::L2Dist;
use linfa_nn::{LinearSearch, NearestNeighbour, NearestNeighbourIndex};
use ndarray::{ArrayView1, ArrayView2};
use rkyv::{Archive, Deserialize, Serialize};

use crate::error::{Result, TrainError};

/// Fitted classifier: the training matrix, its labels and the vocabulary
/// fingerprint of the encoder that produced the matrix.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct KnnClassifier {
    neighbors: u32,
    width: u32,
    samples: Vec<f64>,
    labels: Vec<u8>,
    fingerprint: String,
}

impl KnnClassifier {
    /// Memorize `features` (one row per sample) with their labels.
    pub fn fit(
        features: ArrayView2<'_, f64>,
        labels: &[Outcome],
        neighbors: usize,
        fingerprint: impl Into<String>,
    ) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(TrainError::InconsistentModel(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        let neighbors = u32::try_from(neighbors)
            .map_err(|_| TrainError::InvalidOptions(format!("neighbour count {neighbors} is too large")))?;
        let width = u32::try_from(features.ncols())
            .map_err(|_| TrainError::InconsistentModel("feature row too wide".to_string()))?;

        Ok(Self {
            neighbors,
            width,
            samples: features.iter().copied().collect(),
            labels: labels.iter().map(|label| label.label()).collect(),
            fingerprint: fingerprint.into(),
        })
    }

    pub fn neighbors(&self) -> usize {
        self.neighbors as usize
    }

    /// Encoded row width the classifier was fitted on.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn sample_count(&self) -> usize {
        self.labels.len()
    }

    /// Fingerprint of the encoder vocabulary used at fit time.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Check that the stored matrix and labels agree.
    pub fn validate(&self) -> Result<()> {
        if self.samples.len() != self.labels.len() * self.width() {
            return Err(TrainError::InconsistentModel(format!(
                "{} stored values for {} samples of width {}",
                self.samples.len(),
                self.labels.len(),
                self.width
            )));
        }
        if self.labels.is_empty() {
            return Err(TrainError::InconsistentModel(
                "classifier holds no samples".to_string(),
            ));
        }
        for &label in &self.labels {
            Outcome::from_label(label)
                .map_err(|err| TrainError::InconsistentModel(err.to_string()))?;
        }
        if self.neighbors == 0 {
            return Err(TrainError::InconsistentModel(
                "neighbour count is zero".to_string(),
            ));
        }
        Ok(())
    }

    fn samples_view(&self) -> Result<ArrayView2<'_, f64>> {
        ArrayView2::from_shape((self.labels.len(), self.width()), &self.samples)
            .map_err(|err| TrainError::InconsistentModel(err.to_string()))
    }

    /// Predict the outcome of one encoded row.
    ///
    /// When fewer samples than `neighbors` are stored, every sample votes.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<Outcome> {
        let samples = self.samples_view()?;
        let index = search_index(&samples)?;
        self.vote(index.as_ref(), row)
    }

    /// Predict every row of an encoded matrix.
    pub fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<Outcome>> {
        let samples = self.samples_view()?;
        let index = search_index(&samples)?;
        rows.rows()
            .into_iter()
            .map(|row| self.vote(index.as_ref(), row))
            .collect()
    }

    fn vote(
        &self,
        index: &dyn NearestNeighbourIndex<f64>,
        row: ArrayView1<'_, f64>,
    ) -> Result<Outcome> {
        if row.len() != self.width() {
            return Err(TrainError::FeatureWidth {
                expected: self.width(),
                found: row.len(),
            });
        }
        let k = self.neighbors().min(self.sample_count());
        let nearest = index
            .k_nearest(row, k)
            .map_err(|err| TrainError::InconsistentModel(err.to_string()))?;
        if nearest.is_empty() {
            return Err(TrainError::InconsistentModel(
                "classifier holds no samples".to_string(),
            ));
        }

        let positive = nearest
            .iter()
            .filter(|(_, idx)| self.labels[*idx] == Outcome::Successful.label())
            .count();
        Ok(if positive * 2 > nearest.len() {
            Outcome::Successful
        } else {
            Outcome::Failed
        })
    }
}

fn search_index<'a>(
    samples: &'a ArrayView2<'a, f64>,
) -> Result<Box<dyn NearestNeighbourIndex<f64> + Send + Sync + 'a>> {
    LinearSearch::new()
        .from_batch(samples, L2Dist)
        .map_err(|err| TrainError::InconsistentModel(err.to_string()))
}
