//! Tabular file reading.

mod reader;

pub use reader::{MAX_EXPORT_BYTES, preflight, read_csv_table};
