//! Model artifact file I/O (save, load, hash).

mod hash;
mod load;
mod save;

pub use hash::compute_file_hash;
pub use load::{LoadedArtifact, load_artifact, load_pipeline};
pub use save::save_pipeline;

/// Current artifact format version.
///
/// The loader rejects files with a newer version.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Magic bytes at the start of model files: "KSP" + format generation.
pub const MAGIC_BYTES: [u8; 4] = [b'K', b'S', b'P', 0x01];

/// Conventional file extension for model artifacts.
pub const ARTIFACT_EXTENSION: &str = "ksp";
