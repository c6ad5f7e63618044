//! Feature encoding, training and model artifacts.
//!
//! # Pipeline
//!
//! - [`FeatureEncoder`] one-hot encodes country, parent category and
//!   sub-category against vocabularies learned at fit time and passes the
//!   numeric columns through.
//! - [`KnnClassifier`] votes among the nearest encoded training rows.
//! - [`SuccessPipeline`] binds the two together and is what gets persisted.
//!
//! # File Format
//!
//! ```text
//! +------------------+
//! | Magic: "KSP\x01" | 4 bytes - file identification
//! +------------------+
//! | Version: 1       | 4 bytes - u32 little-endian format version
//! +------------------+
//! | rkyv Payload     | Variable - SuccessPipeline
//! +------------------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ksp_train::{TrainingOptions, load_pipeline, save_pipeline, train};
//!
//! let outcome = train(&table, &TrainingOptions::default())?;
//! save_pipeline(&outcome.pipeline, Path::new("models/success_pred_model.ksp"))?;
//!
//! let pipeline = load_pipeline(Path::new("models/success_pred_model.ksp"))?;
//! let outcome = pipeline.predict(&features)?;
//! ```

mod encoder;
mod error;
mod io;
mod knn;
mod metrics;
mod options;
mod pipeline;
mod split;
mod trainer;

pub use encoder::FeatureEncoder;
pub use error::{ArtifactError, Result, TrainError};
pub use io::{
    ARTIFACT_EXTENSION, CURRENT_FORMAT_VERSION, LoadedArtifact, MAGIC_BYTES, compute_file_hash,
    load_artifact, load_pipeline, save_pipeline,
};
pub use knn::KnnClassifier;
pub use metrics::{ConfusionCounts, EvaluationMetrics};
pub use options::{DEFAULT_NEIGHBORS, DEFAULT_SEED, DEFAULT_TEST_FRACTION, TrainingOptions};
pub use pipeline::{PipelineMetadata, SuccessPipeline};
pub use split::{TrainTestSplit, split_indices};
pub use trainer::{TrainingOutcome, train};
