//! Artifact saving.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::{ARTIFACT_EXTENSION, CURRENT_FORMAT_VERSION, MAGIC_BYTES};
use crate::error::ArtifactError;
use crate::pipeline::SuccessPipeline;

/// Write a pipeline to `path`.
///
/// The bytes go to a sibling temp file that is synced and then renamed over
/// the target, so readers only ever see a complete artifact.
pub fn save_pipeline(pipeline: &SuccessPipeline, path: &Path) -> Result<(), ArtifactError> {
    let bytes = encode_pipeline(pipeline)?;
    let temp_path = path.with_extension(format!("{ARTIFACT_EXTENSION}.tmp"));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ArtifactError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| ArtifactError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(&bytes).map_err(|e| ArtifactError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| ArtifactError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| ArtifactError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(bytes = bytes.len(), "Saved model to {}", path.display());
    Ok(())
}

/// Layout: magic (4 bytes), format version (u32 LE), rkyv payload.
fn encode_pipeline(pipeline: &SuccessPipeline) -> Result<Vec<u8>, ArtifactError> {
    let payload = rkyv::to_bytes::<rkyv::rancor::Error>(pipeline).map_err(|e| {
        ArtifactError::Serialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv serialization failed: {e}"
            ))),
        }
    })?;

    let mut output = Vec::with_capacity(8 + payload.len());
    output.extend_from_slice(&MAGIC_BYTES);
    output.extend_from_slice(&CURRENT_FORMAT_VERSION.to_le_bytes());
    output.extend_from_slice(&payload);
    Ok(output)
}
