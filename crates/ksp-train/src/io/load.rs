//! Artifact loading.

use std::fs;
use std::path::Path;

use rkyv::util::AlignedVec;

use super::hash::digest_bytes;
use super::{CURRENT_FORMAT_VERSION, MAGIC_BYTES};
use crate::error::ArtifactError;
use crate::pipeline::SuccessPipeline;

/// A decoded pipeline and the SHA-256 of the bytes it was decoded from.
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub pipeline: SuccessPipeline,
    pub digest: String,
}

/// Read and validate a pipeline written by [`save_pipeline`](super::save_pipeline).
pub fn load_pipeline(path: &Path) -> Result<SuccessPipeline, ArtifactError> {
    load_artifact(path).map(|artifact| artifact.pipeline)
}

/// Like [`load_pipeline`], also hashing the file. The file is read once, so
/// the digest always describes the pipeline returned with it.
pub fn load_artifact(path: &Path) -> Result<LoadedArtifact, ArtifactError> {
    let bytes = fs::read(path).map_err(|e| ArtifactError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let digest = digest_bytes(&bytes);

    let pipeline = decode_pipeline(&bytes, path)?;
    pipeline.validate().map_err(|source| ArtifactError::Pipeline {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        samples = pipeline.classifier().sample_count(),
        width = pipeline.encoder().width(),
        digest = %digest,
        "Loaded model from {}",
        path.display()
    );
    Ok(LoadedArtifact { pipeline, digest })
}

fn decode_pipeline(bytes: &[u8], path: &Path) -> Result<SuccessPipeline, ArtifactError> {
    if bytes.len() < 12 {
        return Err(ArtifactError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "File too small".to_string(),
        });
    }
    if bytes[0..4] != MAGIC_BYTES {
        return Err(ArtifactError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "Not a model file (invalid magic bytes)".to_string(),
        });
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version > CURRENT_FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_FORMAT_VERSION,
            path: path.to_path_buf(),
        });
    }

    // The archive needs the alignment it was written with.
    let mut payload: AlignedVec = AlignedVec::with_capacity(bytes.len() - 8);
    payload.extend_from_slice(&bytes[8..]);

    rkyv::from_bytes::<SuccessPipeline, rkyv::rancor::Error>(&payload).map_err(|e| {
        ArtifactError::Deserialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv deserialization failed: {e}"
            ))),
        }
    })
}
