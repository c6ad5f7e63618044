//! Model input features.

use serde::{Deserialize, Serialize};

use crate::campaign::CleanCampaignRecord;

/// Categorical feature columns, in encoding order.
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["country", "parent_category", "sub_category"];

/// Numeric feature columns, in pass-through order.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    "days",
    "backers_count",
    "pledged_amt",
    "converted_pledged_amt",
    "goal",
];

/// The eight fields a prediction is made from.
///
/// This is both the training-time feature row and the body of an inference
/// request, so the two can never disagree on names or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignFeatures {
    pub parent_category: String,
    pub sub_category: String,
    #[serde(deserialize_with = "whole_number::deserialize")]
    pub days: u32,
    #[serde(deserialize_with = "whole_number::deserialize")]
    pub backers_count: u64,
    pub pledged_amt: f64,
    pub converted_pledged_amt: f64,
    pub goal: f64,
    pub country: String,
}

impl CampaignFeatures {
    /// Categorical values in [`CATEGORICAL_COLUMNS`] order.
    pub fn categorical_values(&self) -> [&str; 3] {
        [&self.country, &self.parent_category, &self.sub_category]
    }

    /// Numeric values in [`NUMERIC_COLUMNS`] order.
    pub fn numeric_values(&self) -> [f64; 5] {
        [
            f64::from(self.days),
            self.backers_count as f64,
            self.pledged_amt,
            self.converted_pledged_amt,
            self.goal,
        ]
    }
}

impl From<&CleanCampaignRecord> for CampaignFeatures {
    fn from(record: &CleanCampaignRecord) -> Self {
        Self {
            parent_category: record.parent_category.clone(),
            sub_category: record.sub_category.clone(),
            days: record.days,
            backers_count: record.backers_count,
            pledged_amt: record.pledged,
            converted_pledged_amt: record.converted_pledged_amount,
            goal: record.goal,
            country: record.country.clone(),
        }
    }
}

/// Counts sent by form widgets arrive as `10` or `10.0`; both are accepted
/// as long as the value is whole, non-negative and fits the target type.
mod whole_number {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::Deserializer;
    use serde::de::{Error, Unexpected, Visitor};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: TryFrom<u64>,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WholeNumber(PhantomData))
    }

    struct WholeNumber<T>(PhantomData<T>);

    impl<T: TryFrom<u64>> Visitor<'_> for WholeNumber<T> {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a non-negative whole number")
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<T, E> {
            T::try_from(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<T, E> {
            match u64::try_from(value) {
                Ok(value) => self.visit_u64(value),
                Err(_) => Err(E::invalid_value(Unexpected::Signed(value), &self)),
            }
        }

        fn visit_f64<E: Error>(self, value: f64) -> Result<T, E> {
            if value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 {
                self.visit_u64(value as u64)
            } else {
                Err(E::invalid_value(Unexpected::Float(value), &self))
            }
        }
    }
}
