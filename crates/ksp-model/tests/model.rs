//! Tests for ksp-model types.

use ksp_model::{
    CampaignFeatures, CleanCampaignRecord, Outcome, SUB_CATEGORY_NONE, TrainingRow,
    TrainingTable,
};

fn record(name: &str, state: &str) -> CleanCampaignRecord {
    CleanCampaignRecord {
        name: name.to_string(),
        parent_category: "Games".to_string(),
        sub_category: "Tabletop Games".to_string(),
        days: 31,
        backers_count: 250,
        pledged: 15_000.0,
        converted_pledged_amount: 14_250.5,
        goal: 10_000.0,
        country: "GB".to_string(),
        country_displayable_name: "the United Kingdom".to_string(),
        state: state.to_string(),
    }
}

#[test]
fn clean_record_serializes_with_stored_column_names() {
    let json = serde_json::to_value(record("Dungeon Deck", "successful")).unwrap();
    let object = json.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = ksp_model::CLEAN_COLUMNS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);
    assert_eq!(object["pledged_amt"], 15_000.0);
    assert_eq!(object["country_disp_name"], "the United Kingdom");
}

#[test]
fn features_follow_the_clean_record() {
    let features = CampaignFeatures::from(&record("Dungeon Deck", "successful"));
    assert_eq!(features.categorical_values(), ["GB", "Games", "Tabletop Games"]);
    assert_eq!(
        features.numeric_values(),
        [31.0, 250.0, 15_000.0, 14_250.5, 10_000.0]
    );
}

#[test]
fn prediction_request_body_deserializes() {
    let body = r#"{
        "parent_category": "Music",
        "sub_category": "None",
        "days": 30,
        "backers_count": 4,
        "pledged_amt": 120.0,
        "converted_pledged_amt": 120.0,
        "goal": 5000,
        "country": "US"
    }"#;
    let features: CampaignFeatures = serde_json::from_str(body).unwrap();
    assert_eq!(features.sub_category, SUB_CATEGORY_NONE);
    assert_eq!(features.goal, 5000.0);
}

#[test]
fn whole_float_counts_are_accepted() {
    let body = |days: &str, backers: &str| {
        format!(
            r#"{{"parent_category":"Music","sub_category":"None","days":{days},
            "backers_count":{backers},"pledged_amt":120.0,"converted_pledged_amt":120.0,
            "goal":5000,"country":"US"}}"#
        )
    };
    let features: CampaignFeatures = serde_json::from_str(&body("30.0", "10.0")).unwrap();
    assert_eq!(features.days, 30);
    assert_eq!(features.backers_count, 10);

    assert!(serde_json::from_str::<CampaignFeatures>(&body("30", "10.5")).is_err());
    assert!(serde_json::from_str::<CampaignFeatures>(&body("-1.0", "10")).is_err());
    assert!(serde_json::from_str::<CampaignFeatures>(&body("5000000000", "10")).is_err());
}

#[test]
fn table_reports_label_classes() {
    let table: TrainingTable = [
        TrainingRow {
            record: record("a", "successful"),
            label: Outcome::Successful,
        },
        TrainingRow {
            record: record("b", "successful"),
            label: Outcome::Successful,
        },
    ]
    .into_iter()
    .collect();
    assert_eq!(table.len(), 2);
    assert_eq!(table.label_classes().len(), 1);

    let subset = table.select(&[1]);
    assert_eq!(subset.rows()[0].record.name, "b");
}
