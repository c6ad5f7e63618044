//! Record normalizer: raw batch to canonical clean rows.

use std::collections::{BTreeSet, HashSet};

use ksp_model::{CleanCampaignRecord, RawBatch, RawCampaignRecord};
use tracing::{debug, info};

use crate::category::resolve_category;
use crate::duration::{days_between, epoch_to_date};
use crate::error::{NormalizeError, Result};

/// States that end a campaign with a usable outcome.
pub const TERMINAL_STATES: [&str; 2] = ["successful", "failed"];

/// Normalize one raw batch.
///
/// 1. When the batch carries more than two distinct states, rows whose
///    state is not terminal are dropped. A batch that already holds at most
///    two labels is passed through untouched.
/// 2. Exact-duplicate rows are dropped, keeping the first occurrence.
/// 3. Each row is resolved into a [`CleanCampaignRecord`].
///
/// The first defective row fails the whole batch.
pub fn normalize(batch: &RawBatch) -> Result<Vec<CleanCampaignRecord>> {
    let kept = filter_terminal_states(&batch.records);
    let filtered_out = batch.len() - kept.len();

    let mut seen: HashSet<&RawCampaignRecord> = HashSet::with_capacity(kept.len());
    let unique: Vec<(usize, &RawCampaignRecord)> = kept
        .into_iter()
        .filter(|(_, record)| seen.insert(*record))
        .collect();

    let mut clean = Vec::with_capacity(unique.len());
    for (row, record) in &unique {
        clean.push(normalize_record(record, &batch.source, *row)?);
    }

    debug!(
        source = %batch.source,
        filtered_out,
        duplicates = batch.len() - filtered_out - unique.len(),
        "normalized batch detail"
    );
    info!(source = %batch.source, rows = clean.len(), "normalized batch");
    Ok(clean)
}

/// Keep terminal-state rows when the batch has more than two distinct states.
///
/// Returns `(row, record)` pairs with 1-based source row numbers.
pub fn filter_terminal_states(records: &[RawCampaignRecord]) -> Vec<(usize, &RawCampaignRecord)> {
    let distinct: BTreeSet<&str> = records.iter().map(|r| r.state.as_str()).collect();
    let filter = distinct.len() > TERMINAL_STATES.len();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| !filter || TERMINAL_STATES.contains(&record.state.as_str()))
        .map(|(idx, record)| (idx + 1, record))
        .collect()
}

/// Normalize a single raw row.
///
/// `source_name` and `row` only label errors.
pub fn normalize_record(
    record: &RawCampaignRecord,
    source_name: &str,
    row: usize,
) -> Result<CleanCampaignRecord> {
    let category =
        resolve_category(&record.category).map_err(|reason| NormalizeError::MalformedCategory {
            source_name: source_name.to_string(),
            row,
            reason,
        })?;

    let timestamp_error = |column: &'static str, value: i64| NormalizeError::InvalidTimestamp {
        source_name: source_name.to_string(),
        row,
        column,
        value,
    };
    let launched = epoch_to_date(record.launched_at)
        .ok_or_else(|| timestamp_error("launched_at", record.launched_at))?;
    let deadline = epoch_to_date(record.deadline)
        .ok_or_else(|| timestamp_error("deadline", record.deadline))?;

    let days = u32::try_from(days_between(launched, deadline)).map_err(|_| {
        NormalizeError::NegativeDuration {
            source_name: source_name.to_string(),
            row,
            launched_at: record.launched_at,
            deadline: record.deadline,
        }
    })?;

    Ok(CleanCampaignRecord {
        name: record.name.clone(),
        parent_category: category.parent_category,
        sub_category: category.sub_category,
        days,
        backers_count: record.backers_count,
        pledged: record.pledged,
        converted_pledged_amount: record.converted_pledged_amount,
        goal: record.goal,
        country: record.country.clone(),
        country_displayable_name: record.country_displayable_name.clone(),
        state: record.state.clone(),
    })
}
