//! Clean campaign store.
//!
//! The store holds normalized campaign rows using the stored column schema
//! (`name, parent_category, sub_category, days, backers_count, pledged_amt,
//! converted_pledged_amt, goal, country, country_disp_name, state`).

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ksp_model::{CLEAN_COLUMNS, CleanCampaignRecord};

use crate::error::{IngestError, Result};

/// Maximum stored widths of the text columns, in characters.
pub const NAME_WIDTH: usize = 100;
pub const CATEGORY_WIDTH: usize = 30;
pub const COUNTRY_WIDTH: usize = 10;
pub const COUNTRY_NAME_WIDTH: usize = 30;
pub const STATE_WIDTH: usize = 20;

/// Persistence seam for clean campaign rows.
pub trait CampaignStore {
    /// Read every stored row.
    ///
    /// An unavailable store is an error, never an empty result.
    fn load(&self) -> Result<Vec<CleanCampaignRecord>>;

    /// Replace the stored rows.
    fn save(&self, records: &[CleanCampaignRecord]) -> Result<()>;

    /// Add rows after the ones already stored.
    fn append(&self, records: &[CleanCampaignRecord]) -> Result<()>;
}

/// Campaign store backed by a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvCampaignStore {
    path: PathBuf,
}

impl CsvCampaignStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_rows(&self, file: File, records: &[CleanCampaignRecord], headers: bool) -> Result<usize> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(headers)
            .from_writer(file);
        let mut truncated = 0usize;
        for record in records {
            let (fitted, changed) = fit_to_schema(record);
            if changed {
                truncated += 1;
            }
            writer.serialize(&fitted).map_err(|e| self.format_error(&e))?;
        }
        self.finish(writer)?;
        Ok(truncated)
    }

    /// Append rows in the column order of an existing header that differs
    /// from the stored schema. An unnamed index column continues the
    /// existing numbering; other unknown columns are left empty.
    fn write_in_layout(
        &self,
        file: File,
        records: &[CleanCampaignRecord],
        layout: &StoreLayout,
    ) -> Result<usize> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let mut truncated = 0usize;
        for (offset, record) in records.iter().enumerate() {
            let (fitted, changed) = fit_to_schema(record);
            if changed {
                truncated += 1;
            }
            let fields = stored_fields(&fitted);
            let row = layout.headers.iter().map(|column| {
                match CLEAN_COLUMNS.iter().position(|known| *known == column) {
                    Some(pos) => fields[pos].clone(),
                    None if is_index_column(column) => (layout.rows + offset).to_string(),
                    None => String::new(),
                }
            });
            writer.write_record(row).map_err(|e| self.format_error(&e))?;
        }
        self.finish(writer)?;
        Ok(truncated)
    }

    fn finish(&self, mut writer: csv::Writer<File>) -> Result<()> {
        writer.flush().map_err(|e| IngestError::StoreWrite {
            path: self.path.clone(),
            source: e,
        })?;
        let file = writer.into_inner().map_err(|e| IngestError::StoreWrite {
            path: self.path.clone(),
            source: e.into_error(),
        })?;
        file.sync_all().map_err(|e| IngestError::StoreWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Header and row count of the store file, or `None` when it is
    /// missing or empty.
    fn layout(&self) -> Result<Option<StoreLayout>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(IngestError::StoreUnavailable {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader.headers().map_err(|e| self.format_error(&e))?.clone();
        if headers.is_empty() {
            return Ok(None);
        }
        let rows = reader.records().count();
        let missing: Vec<&str> = CLEAN_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::StoreFormat {
                path: self.path.clone(),
                message: format!("header lacks stored column(s) {}", missing.join(", ")),
            });
        }
        Ok(Some(StoreLayout { headers, rows }))
    }

    fn format_error(&self, err: &csv::Error) -> IngestError {
        IngestError::StoreFormat {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| IngestError::StoreWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

impl CampaignStore for CsvCampaignStore {
    fn load(&self) -> Result<Vec<CleanCampaignRecord>> {
        let file = File::open(&self.path).map_err(|e| IngestError::StoreUnavailable {
            path: self.path.clone(),
            source: e,
        })?;
        // Unknown columns (such as a leading unnamed index column) are ignored.
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut records = Vec::new();
        for row in reader.deserialize::<CleanCampaignRecord>() {
            records.push(row.map_err(|e| self.format_error(&e))?);
        }
        tracing::info!(path = %self.path.display(), rows = records.len(), "loaded campaign store");
        Ok(records)
    }

    fn save(&self, records: &[CleanCampaignRecord]) -> Result<()> {
        self.ensure_parent()?;
        let temp_path = self.path.with_extension("csv.tmp");
        let file = File::create(&temp_path).map_err(|e| IngestError::StoreWrite {
            path: temp_path.clone(),
            source: e,
        })?;
        let truncated = self.write_rows(file, records, true)?;
        fs::rename(&temp_path, &self.path).map_err(|e| IngestError::StoreWrite {
            path: self.path.clone(),
            source: e,
        })?;
        if truncated > 0 {
            tracing::warn!(rows = truncated, "truncated text values to stored column widths");
        }
        tracing::info!(path = %self.path.display(), rows = records.len(), "saved campaign store");
        Ok(())
    }

    fn append(&self, records: &[CleanCampaignRecord]) -> Result<()> {
        self.ensure_parent()?;
        let layout = self.layout()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| IngestError::StoreUnavailable {
                path: self.path.clone(),
                source: e,
            })?;
        let truncated = match &layout {
            None => self.write_rows(file, records, true)?,
            Some(layout) if layout.is_canonical() => self.write_rows(file, records, false)?,
            Some(layout) => self.write_in_layout(file, records, layout)?,
        };
        if truncated > 0 {
            tracing::warn!(rows = truncated, "truncated text values to stored column widths");
        }
        tracing::debug!(path = %self.path.display(), rows = records.len(), "appended to campaign store");
        Ok(())
    }
}

/// Column order and row count of an existing store file.
#[derive(Debug)]
struct StoreLayout {
    headers: csv::StringRecord,
    rows: usize,
}

impl StoreLayout {
    fn is_canonical(&self) -> bool {
        self.headers.iter().eq(CLEAN_COLUMNS.iter().copied())
    }
}

/// A leading index column written without a name (`""` or `Unnamed: 0`).
fn is_index_column(column: &str) -> bool {
    column.is_empty() || column.starts_with("Unnamed")
}

/// Field values of a record in [`CLEAN_COLUMNS`] order.
fn stored_fields(record: &CleanCampaignRecord) -> [String; 11] {
    [
        record.name.clone(),
        record.parent_category.clone(),
        record.sub_category.clone(),
        record.days.to_string(),
        record.backers_count.to_string(),
        record.pledged.to_string(),
        record.converted_pledged_amount.to_string(),
        record.goal.to_string(),
        record.country.clone(),
        record.country_displayable_name.clone(),
        record.state.clone(),
    ]
}

/// Clip text columns to their stored widths.
///
/// Returns the fitted record and whether any value was shortened.
pub fn fit_to_schema(record: &CleanCampaignRecord) -> (CleanCampaignRecord, bool) {
    let mut changed = false;
    let mut clip = |value: &str, width: usize| {
        let clipped = truncate_chars(value, width);
        if clipped.len() != value.len() {
            changed = true;
        }
        clipped.to_string()
    };
    let fitted = CleanCampaignRecord {
        name: clip(&record.name, NAME_WIDTH),
        parent_category: clip(&record.parent_category, CATEGORY_WIDTH),
        sub_category: clip(&record.sub_category, CATEGORY_WIDTH),
        country: clip(&record.country, COUNTRY_WIDTH),
        country_displayable_name: clip(&record.country_displayable_name, COUNTRY_NAME_WIDTH),
        state: clip(&record.state, STATE_WIDTH),
        ..record.clone()
    };
    (fitted, changed)
}

fn truncate_chars(value: &str, width: usize) -> &str {
    match value.char_indices().nth(width) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
