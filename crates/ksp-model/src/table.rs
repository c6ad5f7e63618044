//! Labelled training table.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::campaign::CleanCampaignRecord;
use crate::error::{ModelError, Result};
use crate::features::CampaignFeatures;

/// Binary campaign outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Failed,
    Successful,
}

impl Outcome {
    /// Map a terminal raw state to an outcome.
    pub fn from_state(state: &str) -> Result<Self> {
        match state {
            "successful" => Ok(Self::Successful),
            "failed" => Ok(Self::Failed),
            other => Err(ModelError::UnknownState(other.to_string())),
        }
    }

    pub fn from_label(label: u8) -> Result<Self> {
        match label {
            0 => Ok(Self::Failed),
            1 => Ok(Self::Successful),
            other => Err(ModelError::InvalidLabel(other)),
        }
    }

    /// Numeric label (1 = successful).
    pub const fn label(self) -> u8 {
        match self {
            Self::Failed => 0,
            Self::Successful => 1,
        }
    }

    pub const fn state(self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Successful => "successful",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A clean record paired with its binary label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrainingRow {
    pub record: CleanCampaignRecord,
    pub label: Outcome,
}

impl TrainingRow {
    pub fn features(&self) -> CampaignFeatures {
        CampaignFeatures::from(&self.record)
    }
}

/// Ordered collection of labelled rows ready for training.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingTable {
    rows: Vec<TrainingRow>,
}

impl TrainingTable {
    pub fn new(rows: Vec<TrainingRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TrainingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingRow> {
        self.rows.iter()
    }

    /// Distinct outcomes present in the table.
    pub fn label_classes(&self) -> BTreeSet<Outcome> {
        self.rows.iter().map(|row| row.label).collect()
    }

    /// Select rows by position, preserving the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&idx| self.rows[idx].clone()).collect(),
        }
    }
}

impl FromIterator<TrainingRow> for TrainingTable {
    fn from_iter<I: IntoIterator<Item = TrainingRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
