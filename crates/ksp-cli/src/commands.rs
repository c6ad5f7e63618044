//! Subcommand implementations.
//!
//! Each command returns a report that `main` prints; none of them print
//! themselves.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use ksp_ingest::{CampaignStore, CsvCampaignStore, discover_batches, load_raw_batch};
use ksp_model::{CampaignFeatures, Outcome, RawBatch, TrainingTable};
use ksp_normalize::{assemble, assemble_clean, normalize};
use ksp_serve::ServeConfig;
use ksp_train::{
    EvaluationMetrics, TrainingOptions, compute_file_hash, load_pipeline, save_pipeline, train,
};
use tracing::{info, info_span};

/// Default campaign store location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "data/data.csv";

/// Per-batch counts from an ingest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub source: String,
    pub raw_rows: usize,
    pub clean_rows: usize,
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub store: PathBuf,
    pub batches: Vec<BatchReport>,
    pub appended: bool,
}

impl IngestReport {
    pub fn clean_rows(&self) -> usize {
        self.batches.iter().map(|b| b.clean_rows).sum()
    }
}

/// Where training rows come from.
#[derive(Debug, Clone)]
pub enum TrainingSource {
    Store(PathBuf),
    RawDir(PathBuf),
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model: PathBuf,
    pub digest: String,
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub width: usize,
    pub options: TrainingOptions,
    pub metrics: EvaluationMetrics,
}

fn load_batches(raw_dir: &Path) -> Result<Vec<RawBatch>> {
    let paths = discover_batches(raw_dir)
        .with_context(|| format!("discover batches in {}", raw_dir.display()))?;
    if paths.is_empty() {
        bail!("no Kickstarter CSV files found in {}", raw_dir.display());
    }
    paths
        .iter()
        .map(|path| load_raw_batch(path).with_context(|| format!("load {}", path.display())))
        .collect()
}

/// Normalize every raw batch in `raw_dir` and write the rows to `store`.
pub fn run_ingest(raw_dir: &Path, store: &Path, append: bool) -> Result<IngestReport> {
    let span = info_span!("ingest", raw_dir = %raw_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let batches = load_batches(raw_dir)?;
    let mut reports = Vec::with_capacity(batches.len());
    let mut rows = Vec::new();
    for batch in &batches {
        let clean = normalize(batch).with_context(|| format!("normalize {}", batch.source))?;
        reports.push(BatchReport {
            source: batch.source.clone(),
            raw_rows: batch.len(),
            clean_rows: clean.len(),
        });
        rows.extend(clean);
    }

    let campaign_store = CsvCampaignStore::new(store);
    let written = if append {
        campaign_store.append(&rows)
    } else {
        campaign_store.save(&rows)
    };
    written.with_context(|| format!("write campaign store {}", store.display()))?;

    info!(
        batches = reports.len(),
        rows = rows.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "ingest complete"
    );
    Ok(IngestReport {
        store: store.to_path_buf(),
        batches: reports,
        appended: append,
    })
}

/// Build the training table from either source.
pub fn load_training_table(source: &TrainingSource) -> Result<TrainingTable> {
    match source {
        TrainingSource::RawDir(dir) => {
            let batches = load_batches(dir)?;
            assemble(&batches).context("assemble training table")
        }
        TrainingSource::Store(path) => {
            let records = CsvCampaignStore::new(path)
                .load()
                .with_context(|| format!("load campaign store {}", path.display()))?;
            assemble_clean(records).context("assemble training table")
        }
    }
}

/// Train on `source` and write the artifact to `model`.
pub fn run_train(
    source: &TrainingSource,
    model: &Path,
    options: &TrainingOptions,
) -> Result<TrainReport> {
    let table = load_training_table(source)?;
    let outcome = train(&table, options).context("train model")?;
    save_pipeline(&outcome.pipeline, model)
        .with_context(|| format!("save model {}", model.display()))?;
    let digest = compute_file_hash(model).context("hash model")?;

    Ok(TrainReport {
        model: model.to_path_buf(),
        digest,
        rows: table.len(),
        train_rows: outcome.split.train.len(),
        test_rows: outcome.split.test.len(),
        width: outcome.pipeline.encoder().width(),
        options: *options,
        metrics: outcome.metrics,
    })
}

/// Load the artifact at `model` and predict one campaign.
pub fn run_predict(model: &Path, features: &CampaignFeatures) -> Result<Outcome> {
    let pipeline =
        load_pipeline(model).with_context(|| format!("load model {}", model.display()))?;
    pipeline.predict(features).context("predict")
}

/// Serve until interrupted.
pub fn run_serve(config: ServeConfig) -> Result<()> {
    actix_web::rt::System::new()
        .block_on(ksp_serve::run(config))
        .context("run HTTP service")
}
