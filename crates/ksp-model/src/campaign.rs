//! Raw and clean campaign records.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Sub-category value for campaigns filed directly under a parent category.
///
/// This is a real category label, not a missing-value marker: the encoder
/// treats it like any other sub-category.
pub const SUB_CATEGORY_NONE: &str = "None";

/// Source columns projected out of a raw Kickstarter export, in order.
pub const RAW_COLUMNS: [&str; 11] = [
    "name",
    "category",
    "launched_at",
    "deadline",
    "backers_count",
    "pledged",
    "converted_pledged_amount",
    "goal",
    "country",
    "country_displayable_name",
    "state",
];

/// Stored column names of a clean campaign table, in canonical order.
pub const CLEAN_COLUMNS: [&str; 11] = [
    "name",
    "parent_category",
    "sub_category",
    "days",
    "backers_count",
    "pledged_amt",
    "converted_pledged_amt",
    "goal",
    "country",
    "country_disp_name",
    "state",
];

/// Nested category object embedded as JSON in raw exports.
///
/// `parent_name` is only present for sub-categorized campaigns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_name: Option<String>,
}

/// One campaign as ingested from a raw export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCampaignRecord {
    pub name: String,
    /// Category object as raw JSON text.
    pub category: String,
    /// Launch time, seconds since the Unix epoch.
    pub launched_at: i64,
    /// Deadline, seconds since the Unix epoch.
    pub deadline: i64,
    pub backers_count: u64,
    pub pledged: f64,
    pub converted_pledged_amount: f64,
    pub goal: f64,
    pub country: String,
    pub country_displayable_name: String,
    pub state: String,
}

impl RawCampaignRecord {
    #[allow(clippy::type_complexity)]
    fn key(&self) -> (&str, &str, i64, i64, u64, u64, u64, u64, &str, &str, &str) {
        (
            &self.name,
            &self.category,
            self.launched_at,
            self.deadline,
            self.backers_count,
            self.pledged.to_bits(),
            self.converted_pledged_amount.to_bits(),
            self.goal.to_bits(),
            &self.country,
            &self.country_displayable_name,
            &self.state,
        )
    }
}

impl PartialEq for RawCampaignRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for RawCampaignRecord {}

impl Hash for RawCampaignRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Raw records read from one source file.
#[derive(Debug, Clone, Default)]
pub struct RawBatch {
    /// Where the batch came from (file name or other label).
    pub source: String,
    pub records: Vec<RawCampaignRecord>,
}

impl RawBatch {
    pub fn new(source: impl Into<String>, records: Vec<RawCampaignRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Canonical flat campaign row.
///
/// Field order is the canonical column order. Serialized names follow the
/// stored table schema (see [`CLEAN_COLUMNS`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanCampaignRecord {
    pub name: String,
    pub parent_category: String,
    /// Sub-category name, or [`SUB_CATEGORY_NONE`].
    pub sub_category: String,
    /// Whole calendar days between launch date and deadline date.
    pub days: u32,
    pub backers_count: u64,
    #[serde(rename = "pledged_amt")]
    pub pledged: f64,
    #[serde(rename = "converted_pledged_amt")]
    pub converted_pledged_amount: f64,
    pub goal: f64,
    pub country: String,
    #[serde(rename = "country_disp_name")]
    pub country_displayable_name: String,
    pub state: String,
}

impl CleanCampaignRecord {
    /// Returns true when the campaign has no sub-category.
    pub fn has_sub_category(&self) -> bool {
        self.sub_category != SUB_CATEGORY_NONE
    }

    #[allow(clippy::type_complexity)]
    fn key(&self) -> (&str, &str, &str, u32, u64, u64, u64, u64, &str, &str, &str) {
        (
            &self.name,
            &self.parent_category,
            &self.sub_category,
            self.days,
            self.backers_count,
            self.pledged.to_bits(),
            self.converted_pledged_amount.to_bits(),
            self.goal.to_bits(),
            &self.country,
            &self.country_displayable_name,
            &self.state,
        )
    }
}

impl PartialEq for CleanCampaignRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for CleanCampaignRecord {}

impl Hash for CleanCampaignRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn clean(name: &str, pledged: f64) -> CleanCampaignRecord {
        CleanCampaignRecord {
            name: name.to_string(),
            parent_category: "Games".to_string(),
            sub_category: SUB_CATEGORY_NONE.to_string(),
            days: 30,
            backers_count: 12,
            pledged,
            converted_pledged_amount: pledged,
            goal: 1000.0,
            country: "US".to_string(),
            country_displayable_name: "the United States".to_string(),
            state: "successful".to_string(),
        }
    }

    #[test]
    fn equal_rows_collapse_in_a_set() {
        let mut set = HashSet::new();
        set.insert(clean("Deck", 120.5));
        set.insert(clean("Deck", 120.5));
        set.insert(clean("Deck", 120.25));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn sentinel_sub_category_is_not_a_sub_category() {
        let mut record = clean("Deck", 1.0);
        assert!(!record.has_sub_category());
        record.sub_category = "Tabletop Games".to_string();
        assert!(record.has_sub_category());
    }

    #[test]
    fn category_without_parent_deserializes() {
        let category: Category =
            serde_json::from_str(r#"{"id":12,"name":"Games","slug":"games"}"#).unwrap();
        assert_eq!(category.name.as_deref(), Some("Games"));
        assert!(category.parent_name.is_none());
    }
}
