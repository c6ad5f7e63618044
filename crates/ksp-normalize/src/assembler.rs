//! Dataset assembler: many raw batches to one labelled training table.

use std::collections::HashSet;

use ksp_model::{CleanCampaignRecord, Outcome, RawBatch, TrainingRow, TrainingTable};
use tracing::{info, info_span};

use crate::error::AssembleError;
use crate::normalizer::normalize;

/// Normalize every batch and build the training table.
///
/// Stops at the first batch that fails normalization.
pub fn assemble(batches: &[RawBatch]) -> Result<TrainingTable, AssembleError> {
    let span = info_span!("assemble", batches = batches.len());
    let _guard = span.enter();

    let mut combined = Vec::new();
    for batch in batches {
        combined.extend(normalize(batch)?);
    }
    assemble_clean(combined)
}

/// Deduplicate already-clean rows and attach binary labels.
///
/// Row order follows first occurrence.
pub fn assemble_clean(
    records: impl IntoIterator<Item = CleanCampaignRecord>,
) -> Result<TrainingTable, AssembleError> {
    let mut seen: HashSet<CleanCampaignRecord> = HashSet::new();
    let mut rows = Vec::new();
    let mut duplicates = 0usize;

    for record in records {
        if seen.contains(&record) {
            duplicates += 1;
            continue;
        }
        let label =
            Outcome::from_state(&record.state).map_err(|_| AssembleError::UnexpectedState {
                name: record.name.clone(),
                state: record.state.clone(),
            })?;
        seen.insert(record.clone());
        rows.push(TrainingRow { record, label });
    }

    info!(rows = rows.len(), duplicates, "assembled training table");
    Ok(TrainingTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksp_model::RawCampaignRecord;

    fn raw(name: &str, state: &str) -> RawCampaignRecord {
        RawCampaignRecord {
            name: name.to_string(),
            category: r#"{"name":"Comics","parent_name":"Publishing"}"#.to_string(),
            launched_at: 1_600_000_000,
            deadline: 1_602_592_000,
            backers_count: 3,
            pledged: 90.0,
            converted_pledged_amount: 90.0,
            goal: 1000.0,
            country: "DE".to_string(),
            country_displayable_name: "Germany".to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn duplicates_across_batches_collapse() {
        let batches = vec![
            RawBatch::new("Kickstarter.csv", vec![raw("a", "successful"), raw("b", "failed")]),
            RawBatch::new("Kickstarter001.csv", vec![raw("b", "failed"), raw("c", "failed")]),
        ];
        let table = assemble(&batches).unwrap();
        let names: Vec<_> = table.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(table.rows()[0].label, Outcome::Successful);
        assert_eq!(table.rows()[1].label, Outcome::Failed);
    }

    #[test]
    fn non_terminal_state_is_an_invariant_violation() {
        // Two distinct states skip filtering, so "live" reaches label mapping.
        let batches = vec![RawBatch::new(
            "Kickstarter.csv",
            vec![raw("a", "successful"), raw("b", "live")],
        )];
        let err = assemble(&batches).unwrap_err();
        assert_eq!(
            err,
            AssembleError::UnexpectedState {
                name: "b".to_string(),
                state: "live".to_string(),
            }
        );
    }

    #[test]
    fn normalization_failure_propagates() {
        let mut bad = raw("a", "failed");
        bad.category = "not json".to_string();
        let err = assemble(&[RawBatch::new("Kickstarter.csv", vec![bad])]).unwrap_err();
        assert!(matches!(err, AssembleError::Normalize(_)));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(assemble(&[]).unwrap().is_empty());
    }
}
