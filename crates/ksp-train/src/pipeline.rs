//! Fitted encoder plus classifier, persisted and served as one unit.

use ksp_model::{CampaignFeatures, Outcome};
use rkyv::{Archive, Deserialize, Serialize};

use crate::encoder::FeatureEncoder;
use crate::error::{Result, TrainError};
use crate::knn::KnnClassifier;
use crate::metrics::EvaluationMetrics;

/// Provenance recorded alongside a trained pipeline.
#[derive(Debug, Clone, Default, PartialEq, Archive, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// RFC 3339 timestamp of the training run.
    pub trained_at: String,
    pub seed: u64,
    pub train_rows: u64,
    pub test_rows: u64,
    pub metrics: Option<EvaluationMetrics>,
}

/// The unit that turns campaign features into a predicted outcome.
///
/// Immutable once built. [`SuccessPipeline::new`] refuses an encoder and a
/// classifier fitted on different vocabularies.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SuccessPipeline {
    encoder: FeatureEncoder,
    classifier: KnnClassifier,
    metadata: PipelineMetadata,
}

impl SuccessPipeline {
    pub fn new(
        encoder: FeatureEncoder,
        classifier: KnnClassifier,
        metadata: PipelineMetadata,
    ) -> Result<Self> {
        let pipeline = Self {
            encoder,
            classifier,
            metadata,
        };
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Check encoder/classifier agreement and classifier integrity.
    pub fn validate(&self) -> Result<()> {
        let fingerprint = self.encoder.fingerprint();
        if fingerprint != self.classifier.fingerprint()
            || self.encoder.width() != self.classifier.width()
        {
            return Err(TrainError::VocabularyMismatch {
                encoder: fingerprint,
                encoder_width: self.encoder.width(),
                classifier: self.classifier.fingerprint().to_string(),
                classifier_width: self.classifier.width(),
            });
        }
        self.classifier.validate()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn classifier(&self) -> &KnnClassifier {
        &self.classifier
    }

    pub fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    pub(crate) fn set_metrics(&mut self, metrics: EvaluationMetrics) {
        self.metadata.metrics = Some(metrics);
    }

    /// Predict the outcome of one campaign.
    pub fn predict(&self, features: &CampaignFeatures) -> Result<Outcome> {
        let row = self.encoder.transform_one(features);
        self.classifier.predict_row(row.view())
    }

    /// Predict many campaigns at once.
    pub fn predict_batch(&self, rows: &[CampaignFeatures]) -> Result<Vec<Outcome>> {
        let matrix = self.encoder.transform(rows);
        self.classifier.predict(matrix.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(country: &str, backers: u64) -> CampaignFeatures {
        CampaignFeatures {
            parent_category: "Games".to_string(),
            sub_category: "None".to_string(),
            days: 30,
            backers_count: backers,
            pledged_amt: 0.0,
            converted_pledged_amt: 0.0,
            goal: 100.0,
            country: country.to_string(),
        }
    }

    fn parts() -> (FeatureEncoder, KnnClassifier) {
        let rows = vec![features("US", 0), features("GB", 500)];
        let encoder = FeatureEncoder::fit(&rows);
        let matrix = encoder.transform(&rows);
        let classifier = KnnClassifier::fit(
            matrix.view(),
            &[Outcome::Failed, Outcome::Successful],
            1,
            encoder.fingerprint(),
        )
        .unwrap();
        (encoder, classifier)
    }

    #[test]
    fn matching_parts_predict() {
        let (encoder, classifier) = parts();
        let pipeline = SuccessPipeline::new(encoder, classifier, PipelineMetadata::default()).unwrap();
        assert_eq!(
            pipeline.predict(&features("GB", 480)).unwrap(),
            Outcome::Successful
        );
        assert_eq!(
            pipeline
                .predict_batch(&[features("US", 3), features("GB", 520)])
                .unwrap(),
            vec![Outcome::Failed, Outcome::Successful]
        );
    }

    #[test]
    fn unseen_country_still_predicts() {
        let (encoder, classifier) = parts();
        let pipeline = SuccessPipeline::new(encoder, classifier, PipelineMetadata::default()).unwrap();
        assert!(pipeline.predict(&features("ZZ", 10)).is_ok());
    }

    #[test]
    fn mismatched_vocabulary_is_rejected() {
        let (_, classifier) = parts();
        let other = FeatureEncoder::fit(&[features("US", 0), features("DE", 1)]);
        let err = SuccessPipeline::new(other, classifier, PipelineMetadata::default()).unwrap_err();
        assert!(matches!(err, TrainError::VocabularyMismatch { .. }));
    }
}
