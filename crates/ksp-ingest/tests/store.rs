//! Integration tests for the CSV campaign store.

use std::fs;

use ksp_ingest::{CampaignStore, CsvCampaignStore, IngestError};
use ksp_model::{CleanCampaignRecord, SUB_CATEGORY_NONE};
use tempfile::tempdir;

fn record(name: &str, state: &str) -> CleanCampaignRecord {
    CleanCampaignRecord {
        name: name.to_string(),
        parent_category: "Music".to_string(),
        sub_category: SUB_CATEGORY_NONE.to_string(),
        days: 45,
        backers_count: 7,
        pledged: 310.25,
        converted_pledged_amount: 298.0,
        goal: 2500.0,
        country: "CA".to_string(),
        country_displayable_name: "Canada".to_string(),
        state: state.to_string(),
    }
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let store = CsvCampaignStore::new(dir.path().join("nested/clean.csv"));
    let rows = vec![record("Album, vol. 2", "successful"), record("Tour", "failed")];

    store.save(&rows).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, rows);
}

#[test]
fn append_adds_rows_and_writes_header_once() {
    let dir = tempdir().unwrap();
    let store = CsvCampaignStore::new(dir.path().join("clean.csv"));

    store.append(&[record("First", "failed")]).unwrap();
    store.append(&[record("Second", "successful")]).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("name,")).count(), 1);
    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].name, "Second");
}

#[test]
fn load_ignores_leading_index_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(
        &path,
        "Unnamed: 0,name,parent_category,sub_category,days,backers_count,pledged_amt,\
converted_pledged_amt,goal,country,country_disp_name,state\n\
0,Deck,Games,Tabletop Games,31,250,15000.5,15000.5,10000,US,the United States,successful\n",
    )
    .unwrap();

    let loaded = CsvCampaignStore::new(&path).load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].sub_category, "Tabletop Games");
    assert_eq!(loaded[0].goal, 10000.0);
}

#[test]
fn load_rejects_malformed_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(
        &path,
        "name,parent_category,sub_category,days,backers_count,pledged_amt,\
converted_pledged_amt,goal,country,country_disp_name,state\n\
Deck,Games,None,many,1,1,1,1,US,the United States,failed\n",
    )
    .unwrap();

    let result = CsvCampaignStore::new(&path).load();
    assert!(matches!(result, Err(IngestError::StoreFormat { .. })));
}

#[test]
fn append_follows_an_indexed_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(
        &path,
        ",name,parent_category,sub_category,days,backers_count,pledged_amt,\
converted_pledged_amt,goal,country,country_disp_name,state\n\
0,Deck,Games,Tabletop Games,31,250,15000.5,15000.5,10000,US,the United States,successful\n",
    )
    .unwrap();
    let store = CsvCampaignStore::new(&path);
    assert_eq!(store.load().unwrap().len(), 1);

    store
        .append(&[record("Tour", "failed"), record("Album", "successful")])
        .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[1], record("Tour", "failed"));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.lines().nth(2).unwrap().starts_with("1,Tour,Music,"));
    assert!(text.lines().nth(3).unwrap().starts_with("2,Album,"));
}

#[test]
fn append_rejects_a_header_without_stored_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "name,goal\nDeck,100\n").unwrap();

    let err = CsvCampaignStore::new(&path)
        .append(&[record("Tour", "failed")])
        .unwrap_err();
    match err {
        IngestError::StoreFormat { message, .. } => {
            assert!(message.contains("parent_category"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "name,goal\nDeck,100\n");
}
