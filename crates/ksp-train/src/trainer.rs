//! Split, fit and evaluate.

use std::time::Instant;

use chrono::Utc;
use ksp_model::{CampaignFeatures, Outcome, TrainingTable};
use tracing::{info, info_span};

use crate::encoder::FeatureEncoder;
use crate::error::{Result, TrainError};
use crate::knn::KnnClassifier;
use crate::metrics::EvaluationMetrics;
use crate::options::TrainingOptions;
use crate::pipeline::{PipelineMetadata, SuccessPipeline};
use crate::split::{TrainTestSplit, split_indices};

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub pipeline: SuccessPipeline,
    pub metrics: EvaluationMetrics,
    pub split: TrainTestSplit,
}

/// Train a pipeline on `table` and score it on the held-out rows.
///
/// The encoder only sees the training partition, so test rows may carry
/// categories that encode as all zeros.
pub fn train(table: &TrainingTable, options: &TrainingOptions) -> Result<TrainingOutcome> {
    let span = info_span!("train", rows = table.len(), seed = options.seed);
    let _guard = span.enter();
    let start = Instant::now();

    options.validate()?;
    if table.is_empty() {
        return Err(TrainError::EmptyTable);
    }

    let labels: Vec<Outcome> = table.iter().map(|row| row.label).collect();
    let split = split_indices(&labels, options.test_fraction, options.seed);
    let train_rows = table.select(&split.train);
    let test_rows = table.select(&split.test);

    let found = train_rows.label_classes().len();
    if found < 2 {
        return Err(TrainError::LabelCardinality { found });
    }

    let (train_features, train_labels) = features_and_labels(&train_rows);
    let encoder = FeatureEncoder::fit(&train_features);
    let matrix = encoder.transform(&train_features);
    let classifier = KnnClassifier::fit(
        matrix.view(),
        &train_labels,
        options.neighbors,
        encoder.fingerprint(),
    )?;

    let metadata = PipelineMetadata {
        trained_at: Utc::now().to_rfc3339(),
        seed: options.seed,
        train_rows: train_rows.len() as u64,
        test_rows: test_rows.len() as u64,
        metrics: None,
    };
    let mut pipeline = SuccessPipeline::new(encoder, classifier, metadata)?;

    let (test_features, test_labels) = features_and_labels(&test_rows);
    let predicted = pipeline.predict_batch(&test_features)?;
    let metrics = EvaluationMetrics::from_predictions(&test_labels, &predicted)?;
    pipeline.set_metrics(metrics);

    info!(
        train_rows = train_rows.len(),
        test_rows = test_rows.len(),
        width = pipeline.encoder().width(),
        accuracy = metrics.accuracy,
        f1 = metrics.f1,
        duration_ms = start.elapsed().as_millis() as u64,
        "trained pipeline"
    );

    Ok(TrainingOutcome {
        pipeline,
        metrics,
        split,
    })
}

fn features_and_labels(table: &TrainingTable) -> (Vec<CampaignFeatures>, Vec<Outcome>) {
    table.iter().map(|row| (row.features(), row.label)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksp_model::{CleanCampaignRecord, TrainingRow};

    fn row(idx: usize, label: Outcome) -> TrainingRow {
        let backers = match label {
            Outcome::Successful => 400 + idx as u64,
            Outcome::Failed => idx as u64,
        };
        TrainingRow {
            record: CleanCampaignRecord {
                name: format!("campaign {idx}"),
                parent_category: "Games".to_string(),
                sub_category: "None".to_string(),
                days: 30,
                backers_count: backers,
                pledged: backers as f64 * 10.0,
                converted_pledged_amount: backers as f64 * 10.0,
                goal: 1000.0,
                country: "US".to_string(),
                country_displayable_name: "the United States".to_string(),
                state: label.state().to_string(),
            },
            label,
        }
    }

    fn table(n: usize) -> TrainingTable {
        (0..n)
            .map(|idx| {
                let label = if idx % 2 == 0 {
                    Outcome::Successful
                } else {
                    Outcome::Failed
                };
                row(idx, label)
            })
            .collect()
    }

    #[test]
    fn separable_table_trains_and_scores() {
        let outcome = train(&table(40), &TrainingOptions::default()).unwrap();
        assert_eq!(outcome.split.test.len(), 8);
        assert_eq!(outcome.split.train.len(), 32);
        assert_eq!(outcome.metrics.accuracy, 1.0);
        assert_eq!(outcome.pipeline.metadata().metrics, Some(outcome.metrics));
        assert_eq!(outcome.pipeline.metadata().seed, 15);
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = train(&TrainingTable::default(), &TrainingOptions::default()).unwrap_err();
        assert_eq!(err, TrainError::EmptyTable);
    }

    #[test]
    fn single_label_is_rejected_before_fitting() {
        let table: TrainingTable = (0..10).map(|idx| row(idx, Outcome::Failed)).collect();
        let err = train(&table, &TrainingOptions::default()).unwrap_err();
        assert_eq!(err, TrainError::LabelCardinality { found: 1 });
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = TrainingOptions::default().with_neighbors(0);
        assert!(matches!(
            train(&table(10), &options),
            Err(TrainError::InvalidOptions(_))
        ));
    }
}
