//! Campaign data model.
//!
//! Fixed record schemas for the raw campaign rows read from Kickstarter
//! exports, the clean rows produced by normalization, the labelled training
//! table, and the feature set accepted at inference time.

pub mod campaign;
pub mod error;
pub mod features;
pub mod table;

pub use campaign::{
    CLEAN_COLUMNS, Category, CleanCampaignRecord, RAW_COLUMNS, RawBatch, RawCampaignRecord,
    SUB_CATEGORY_NONE,
};
pub use error::{ModelError, Result};
pub use features::{CATEGORICAL_COLUMNS, CampaignFeatures, NUMERIC_COLUMNS};
pub use table::{Outcome, TrainingRow, TrainingTable};
