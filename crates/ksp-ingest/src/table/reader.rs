//! CSV file reading for raw campaign exports.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Largest export accepted, in bytes.
pub const MAX_EXPORT_BYTES: u64 = 500 * 1024 * 1024;

/// Byte-order marks of encodings the reader cannot decode.
const UNSUPPORTED_MARKS: [(&[u8], &str); 2] = [
    (&[0xFF, 0xFE], "UTF-16 LE"),
    (&[0xFE, 0xFF], "UTF-16 BE"),
];

/// Open `path` once and reject it before polars sees it: missing, empty,
/// larger than `max_bytes`, or starting with a UTF-16 byte-order mark.
pub fn preflight(path: &Path, max_bytes: u64) -> Result<()> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let size = file
        .metadata()
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if size == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if size > max_bytes {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: max_bytes,
        });
    }

    let mut prefix = Vec::with_capacity(2);
    file.take(2)
        .read_to_end(&mut prefix)
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    match UNSUPPORTED_MARKS
        .iter()
        .find(|(mark, _)| prefix.as_slice() == *mark)
    {
        Some((_, encoding)) => Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: *encoding,
        }),
        None => Ok(()),
    }
}

/// Reads a CSV file with a single header row into a Polars DataFrame.
///
/// Every column is read as text; typed extraction happens per column when
/// records are built, so a stray value in a late row cannot break schema
/// inference.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    preflight(path, MAX_EXPORT_BYTES)?;

    let parse_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(SerReader::finish)
        .map_err(parse_error)?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read csv table"
    );

    Ok(df)
}

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn every_column_is_read_as_text() {
        let file = create_temp_csv(b"name,backers_count\nDeck,12\nLamp,3\n");
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        assert_eq!(
            df.column("backers_count").unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn missing_export_is_file_not_found() {
        let result = read_csv_table(Path::new("/nonexistent/Kickstarter.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn utf16_exports_are_rejected() {
        let file = create_temp_csv(&[0xFE, 0xFF, 0x00, b'n']);
        assert!(matches!(
            preflight(file.path(), MAX_EXPORT_BYTES),
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 BE",
                ..
            })
        ));
    }

    #[test]
    fn empty_export_is_rejected() {
        let file = create_temp_csv(b"");
        assert!(matches!(
            read_csv_table(file.path()),
            Err(IngestError::EmptyCsv { .. })
        ));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let file = create_temp_csv(b"name\nDeck\n");
        assert!(preflight(file.path(), 10).is_ok());
        assert!(matches!(
            preflight(file.path(), 9),
            Err(IngestError::FileTooLarge { size: 10, .. })
        ));
    }
}
