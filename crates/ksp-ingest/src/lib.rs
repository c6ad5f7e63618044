//! Campaign data ingestion.
//!
//! This crate reads raw Kickstarter exports into typed records and persists
//! normalized campaign rows.
//!
//! # Features
//!
//! - **CSV Loading**: Read raw exports with Polars, every column as text
//! - **Batch Discovery**: Find `Kickstarter.csv`, `Kickstarter001.csv`, ... in order
//! - **Record Extraction**: Project the eleven source columns into `RawCampaignRecord`
//! - **Campaign Store**: Load and save clean rows behind the `CampaignStore` trait
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ksp_ingest::{CampaignStore, CsvCampaignStore, discover_batches, load_raw_batch};
//!
//! for path in discover_batches(Path::new("data/csv_files"))? {
//!     let batch = load_raw_batch(&path)?;
//!     println!("{}: {} rows", batch.source, batch.len());
//! }
//!
//! let store = CsvCampaignStore::new("data/data.csv");
//! let rows = store.load()?;
//! ```

mod discovery;
mod error;
mod raw;
mod store;
mod table;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{MAX_EXPORT_BYTES, preflight, read_csv_table};

// === Batch Discovery ===
pub use discovery::{BATCH_STEM, batch_index, discover_batches, list_csv_files};

// === Raw Records ===
pub use raw::{load_raw_batch, raw_records_from_frame};

// === Campaign Store ===
pub use store::{CampaignStore, CsvCampaignStore, fit_to_schema};
