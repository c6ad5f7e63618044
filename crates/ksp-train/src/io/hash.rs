//! Artifact digests.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::ArtifactError;

/// SHA-256 of a file, hex encoded.
///
/// Reported by the CLI after training and by the service health endpoint
/// so operators can tell which artifact is live.
pub fn compute_file_hash(path: &Path) -> Result<String, ArtifactError> {
    let read_error = |e: std::io::Error| ArtifactError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    };
    let mut reader = BufReader::new(File::open(path).map_err(read_error)?);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 of bytes already in memory, hex encoded.
pub(crate) fn digest_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn known_digest() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();

        assert_eq!(
            compute_file_hash(file.path()).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn in_memory_digest_matches_file_digest() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();

        assert_eq!(digest_bytes(b"abc"), compute_file_hash(file.path()).unwrap());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = compute_file_hash(Path::new("/nonexistent/model.ksp")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { operation: "read", .. }));
    }
}
