//! Raw Kickstarter export loading.

use std::path::Path;

use polars::prelude::*;

use ksp_model::{RAW_COLUMNS, RawBatch, RawCampaignRecord};

use crate::error::{IngestError, Result};
use crate::table::read_csv_table;
use crate::values::{parse_f64, parse_i64, parse_u64};

/// Load one raw export file as a batch.
///
/// Only the eleven source columns are extracted; every other column of the
/// export is ignored. A missing column or an unparseable required value
/// fails the whole file.
pub fn load_raw_batch(path: &Path) -> Result<RawBatch> {
    let df = read_csv_table(path)?;
    let records = raw_records_from_frame(&df, path)?;
    let source = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
        .to_string();
    tracing::info!(source = %source, rows = records.len(), "loaded raw batch");
    Ok(RawBatch::new(source, records))
}

/// Extract typed raw records from a DataFrame of a raw export.
///
/// The source columns must be string columns, as [`read_csv_table`] reads
/// them; a null cell is treated as empty.
pub fn raw_records_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<RawCampaignRecord>> {
    let mut columns = Vec::with_capacity(RAW_COLUMNS.len());
    for name in RAW_COLUMNS {
        let column = df.column(name).map_err(|_| IngestError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })?;
        columns.push(column.str()?);
    }

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut cells = Vec::with_capacity(columns.len());
        for column in &columns {
            cells.push(column.get(idx).unwrap_or_default().to_string());
        }
        records.push(build_record(&cells, idx + 1, path)?);
    }
    Ok(records)
}

fn build_record(cells: &[String], row: usize, path: &Path) -> Result<RawCampaignRecord> {
    let invalid = |col: usize| IngestError::InvalidValue {
        column: RAW_COLUMNS[col].to_string(),
        value: cells[col].clone(),
        row,
        path: path.to_path_buf(),
    };
    let text = |col: usize| -> Result<String> {
        let value = cells[col].trim();
        if value.is_empty() {
            Err(invalid(col))
        } else {
            Ok(value.to_string())
        }
    };

    // Names are free text: kept verbatim, only presence is required.
    if cells[0].is_empty() {
        return Err(invalid(0));
    }

    Ok(RawCampaignRecord {
        name: cells[0].clone(),
        category: text(1)?,
        launched_at: parse_i64(&cells[2]).ok_or_else(|| invalid(2))?,
        deadline: parse_i64(&cells[3]).ok_or_else(|| invalid(3))?,
        backers_count: parse_u64(&cells[4]).ok_or_else(|| invalid(4))?,
        pledged: parse_amount(&cells[5]).ok_or_else(|| invalid(5))?,
        converted_pledged_amount: parse_amount(&cells[6]).ok_or_else(|| invalid(6))?,
        goal: parse_amount(&cells[7]).ok_or_else(|| invalid(7))?,
        country: text(8)?,
        country_displayable_name: text(9)?,
        state: text(10)?,
    })
}

fn parse_amount(value: &str) -> Option<f64> {
    parse_f64(value).filter(|v| *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "id,name,category,launched_at,deadline,backers_count,pledged,\
converted_pledged_amount,goal,country,country_displayable_name,state,slug\n";

    fn create_temp_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_raw_batch_extracts_source_columns() {
        let file = create_temp_csv(&[
            r#"1,Dungeon Deck,"{""name"":""Tabletop Games"",""parent_name"":""Games""}",1577836800,1580515200,250,15000.5,15000.5,10000,US,the United States,successful,dungeon-deck"#,
            r#"2,Lamp,"{""name"":""Design""}",1577836800,1578441600,3,40,40,500.0,GB,the United Kingdom,failed,lamp"#,
        ]);
        let batch = load_raw_batch(file.path()).unwrap();

        assert_eq!(batch.len(), 2);
        let first = &batch.records[0];
        assert_eq!(first.name, "Dungeon Deck");
        assert_eq!(
            first.category,
            r#"{"name":"Tabletop Games","parent_name":"Games"}"#
        );
        assert_eq!(first.launched_at, 1_577_836_800);
        assert_eq!(first.backers_count, 250);
        assert_eq!(first.pledged, 15000.5);
        assert_eq!(batch.records[1].goal, 500.0);
        assert_eq!(batch.records[1].state, "failed");
    }

    #[test]
    fn test_load_raw_batch_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,category\nDeck,{{}}").unwrap();
        file.flush().unwrap();

        let result = load_raw_batch(file.path());
        assert!(matches!(
            result,
            Err(IngestError::MissingColumn { ref column, .. }) if column == "launched_at"
        ));
    }

    #[test]
    fn test_load_raw_batch_rejects_unparseable_timestamp() {
        let file = create_temp_csv(&[
            r#"1,Deck,"{""name"":""Games""}",soon,1580515200,1,1,1,1,US,the United States,failed,deck"#,
        ]);
        let result = load_raw_batch(file.path());
        assert!(matches!(
            result,
            Err(IngestError::InvalidValue { ref column, row: 1, .. }) if column == "launched_at"
        ));
    }
}
