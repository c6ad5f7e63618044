//! Training and artifact error types.
//!
//! [`TrainError`] covers fitting and prediction; [`ArtifactError`] covers
//! reading and writing the persisted pipeline and carries user-facing
//! messages the same way the store errors do.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fitting or applying a pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    #[error("cannot train on an empty table")]
    EmptyTable,

    #[error("training partition holds {found} distinct label(s); two are required")]
    LabelCardinality { found: usize },

    #[error("invalid training options: {0}")]
    InvalidOptions(String),

    /// The encoder and classifier were not fitted on the same vocabulary.
    #[error(
        "encoder vocabulary {encoder} (width {encoder_width}) does not match classifier vocabulary {classifier} (width {classifier_width})"
    )]
    VocabularyMismatch {
        encoder: String,
        encoder_width: usize,
        classifier: String,
        classifier_width: usize,
    },

    #[error("feature row has {found} values, expected {expected}")]
    FeatureWidth { expected: usize, found: usize },

    #[error("inconsistent model: {0}")]
    InconsistentModel(String),
}

/// Result type alias for training operations.
pub type Result<T> = std::result::Result<T, TrainError>;

/// Errors raised while saving or loading a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to {operation} model file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model file format: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Model file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    #[error("Failed to serialize model")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to deserialize model")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to complete model save")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file decoded but the pipeline inside is not usable.
    #[error("Model file {path} holds an unusable pipeline")]
    Pipeline {
        path: PathBuf,
        #[source]
        source: TrainError,
    },
}

impl ArtifactError {
    /// Message suitable for showing to an operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the model file at {}", operation, path.display()),
            Self::InvalidFormat { path, reason } => format!(
                "The file at {} is not a model file: {}",
                path.display(),
                reason
            ),
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => format!(
                "This model was written by a newer release (file version {found}, \
                 this build reads up to {max_supported}). Retrain or upgrade."
            ),
            Self::Serialization { .. } => "An error occurred while encoding the model.".to_string(),
            Self::Deserialization { .. } => {
                "An error occurred while reading the model. The file may be corrupted.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the model to {}. Check disk space and permissions.",
                target_path.display()
            ),
            Self::Pipeline { path, source } => {
                format!("The model at {} cannot be used: {}", path.display(), source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_cardinality_message_names_count() {
        let err = TrainError::LabelCardinality { found: 1 };
        assert!(err.to_string().contains("1 distinct label"));
    }

    #[test]
    fn user_message_includes_path() {
        let err = ArtifactError::InvalidFormat {
            path: PathBuf::from("models/x.ksp"),
            reason: "File too small".to_string(),
        };
        let message = err.user_message();
        assert!(message.contains("models/x.ksp"));
        assert!(message.contains("File too small"));
    }
}
