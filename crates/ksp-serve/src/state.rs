//! Loaded model shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use ksp_model::{CampaignFeatures, Outcome};
use ksp_train::{SuccessPipeline, load_artifact};
use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// A pipeline together with where it came from.
#[derive(Debug)]
pub struct LoadedModel {
    pub pipeline: SuccessPipeline,
    /// SHA-256 of the artifact file.
    pub digest: String,
    pub loaded_at: String,
}

impl LoadedModel {
    fn read(path: &Path) -> Result<Self> {
        let artifact = load_artifact(path)?;
        Ok(Self {
            pipeline: artifact.pipeline,
            digest: artifact.digest,
            loaded_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Selector values a client can offer, taken from the training vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOptions {
    pub countries: Vec<String>,
    pub parent_categories: Vec<String>,
    pub sub_categories: Vec<String>,
}

/// Inference state: the artifact path and the pipeline currently served.
///
/// Built once by [`ModelService::load`]. Handlers read the current pipeline
/// without locking; [`ModelService::reload`] swaps in a new one.
pub struct ModelService {
    model_path: PathBuf,
    current: ArcSwap<LoadedModel>,
}

impl ModelService {
    pub fn load(model_path: impl Into<PathBuf>) -> Result<Self> {
        let model_path = model_path.into();
        let model = LoadedModel::read(&model_path)?;
        info!(path = %model_path.display(), digest = %model.digest, "model service ready");
        Ok(Self {
            model_path,
            current: ArcSwap::from_pointee(model),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// The pipeline serving requests right now.
    pub fn current(&self) -> Arc<LoadedModel> {
        self.current.load_full()
    }

    /// Re-read the artifact and swap it in. On failure the old model stays.
    pub fn reload(&self) -> Result<Arc<LoadedModel>> {
        let model = Arc::new(LoadedModel::read(&self.model_path)?);
        self.current.store(Arc::clone(&model));
        info!(digest = %model.digest, "model reloaded");
        Ok(model)
    }

    pub fn predict(&self, features: &CampaignFeatures) -> Result<Outcome> {
        let model = self.current.load();
        Ok(model.pipeline.predict(features)?)
    }

    pub fn options(&self) -> ModelOptions {
        let model = self.current.load();
        let encoder = model.pipeline.encoder();
        ModelOptions {
            countries: encoder.countries().to_vec(),
            parent_categories: encoder.parent_categories().to_vec(),
            sub_categories: encoder.sub_categories().to_vec(),
        }
    }
}
