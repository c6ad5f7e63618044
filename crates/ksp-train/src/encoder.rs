//! One-hot feature encoder.
//!
//! The encoded row layout is fixed at fit time:
//!
//! ```text
//! [ country one-hot | parent_category one-hot | sub_category one-hot |
//!   days, backers_count, pledged_amt, converted_pledged_amt, goal ]
//! ```
//!
//! Each vocabulary is the sorted set of values seen during `fit`. A value
//! outside the vocabulary leaves its whole indicator block at zero.

use std::collections::BTreeSet;

use ksp_model::{CATEGORICAL_COLUMNS, CampaignFeatures, NUMERIC_COLUMNS};
use ndarray::{Array1, Array2, ArrayViewMut1};
use rkyv::{Archive, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Fitted categorical vocabularies.
#[derive(Debug, Clone, PartialEq, Default, Archive, Serialize, Deserialize)]
pub struct FeatureEncoder {
    countries: Vec<String>,
    parent_categories: Vec<String>,
    sub_categories: Vec<String>,
}

impl FeatureEncoder {
    /// Learn the vocabulary of each categorical column.
    pub fn fit(rows: &[CampaignFeatures]) -> Self {
        let mut vocabularies: [BTreeSet<&str>; 3] = Default::default();
        for row in rows {
            for (vocabulary, value) in vocabularies.iter_mut().zip(row.categorical_values()) {
                vocabulary.insert(value);
            }
        }
        let [countries, parent_categories, sub_categories]: [Vec<String>; 3] =
            vocabularies.map(|set| set.into_iter().map(str::to_string).collect());

        let encoder = Self {
            countries,
            parent_categories,
            sub_categories,
        };
        debug!(
            countries = encoder.countries.len(),
            parent_categories = encoder.parent_categories.len(),
            sub_categories = encoder.sub_categories.len(),
            "fitted feature encoder"
        );
        encoder
    }

    /// Vocabularies in [`CATEGORICAL_COLUMNS`] order.
    pub fn vocabularies(&self) -> [&[String]; 3] {
        [
            &self.countries,
            &self.parent_categories,
            &self.sub_categories,
        ]
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn parent_categories(&self) -> &[String] {
        &self.parent_categories
    }

    pub fn sub_categories(&self) -> &[String] {
        &self.sub_categories
    }

    /// Number of values in one encoded row.
    pub fn width(&self) -> usize {
        self.vocabularies().iter().map(|v| v.len()).sum::<usize>() + NUMERIC_COLUMNS.len()
    }

    /// SHA-256 over the column names and vocabularies, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (column, vocabulary) in CATEGORICAL_COLUMNS.iter().zip(self.vocabularies()) {
            hasher.update(column.as_bytes());
            hasher.update([0x1d]);
            for value in vocabulary {
                hasher.update(value.as_bytes());
                hasher.update([0x1f]);
            }
            hasher.update([0x1e]);
        }
        hex::encode(hasher.finalize())
    }

    /// Encode many rows into a matrix with one row per input.
    pub fn transform(&self, rows: &[CampaignFeatures]) -> Array2<f64> {
        let mut matrix = Array2::zeros((rows.len(), self.width()));
        for (features, out) in rows.iter().zip(matrix.rows_mut()) {
            self.encode_into(features, out);
        }
        matrix
    }

    /// Encode a single row.
    pub fn transform_one(&self, features: &CampaignFeatures) -> Array1<f64> {
        let mut row = Array1::zeros(self.width());
        self.encode_into(features, row.view_mut());
        row
    }

    fn encode_into(&self, features: &CampaignFeatures, mut out: ArrayViewMut1<'_, f64>) {
        let mut offset = 0;
        for ((column, vocabulary), value) in CATEGORICAL_COLUMNS
            .iter()
            .zip(self.vocabularies())
            .zip(features.categorical_values())
        {
            match vocabulary.binary_search_by(|known| known.as_str().cmp(value)) {
                Ok(position) => out[offset + position] = 1.0,
                Err(_) => debug!(column, value, "unseen category encoded as all zeros"),
            }
            offset += vocabulary.len();
        }
        for (idx, value) in features.numeric_values().into_iter().enumerate() {
            out[offset + idx] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(country: &str, parent: &str, sub: &str) -> CampaignFeatures {
        CampaignFeatures {
            parent_category: parent.to_string(),
            sub_category: sub.to_string(),
            days: 30,
            backers_count: 12,
            pledged_amt: 450.0,
            converted_pledged_amt: 430.5,
            goal: 1000.0,
            country: country.to_string(),
        }
    }

    fn fitted() -> FeatureEncoder {
        FeatureEncoder::fit(&[
            features("US", "Games", "Tabletop Games"),
            features("GB", "Music", "None"),
            features("US", "Games", "None"),
        ])
    }

    #[test]
    fn vocabularies_are_sorted_and_distinct() {
        let encoder = fitted();
        assert_eq!(encoder.countries(), ["GB", "US"]);
        assert_eq!(encoder.parent_categories(), ["Games", "Music"]);
        assert_eq!(encoder.sub_categories(), ["None", "Tabletop Games"]);
        assert_eq!(encoder.width(), 2 + 2 + 2 + 5);
    }

    #[test]
    fn known_values_set_one_indicator_per_block() {
        let row = fitted().transform_one(&features("US", "Music", "Tabletop Games"));
        assert_eq!(
            row.to_vec(),
            vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 30.0, 12.0, 450.0, 430.5, 1000.0]
        );
    }

    #[test]
    fn unseen_country_leaves_block_at_zero() {
        let row = fitted().transform_one(&features("ZZ", "Games", "None"));
        assert_eq!(&row.to_vec()[..6], &[0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn transform_matches_transform_one() {
        let encoder = fitted();
        let rows = vec![features("GB", "Games", "None"), features("FR", "Art", "X")];
        let matrix = encoder.transform(&rows);
        assert_eq!(matrix.nrows(), 2);
        for (idx, row) in rows.iter().enumerate() {
            assert_eq!(matrix.row(idx), encoder.transform_one(row));
        }
    }

    #[test]
    fn fingerprint_tracks_vocabulary() {
        let a = fitted();
        let b = fitted();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let c = FeatureEncoder::fit(&[features("US", "Games", "None")]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
