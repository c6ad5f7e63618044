//! Training configuration.

use crate::error::{Result, TrainError};

/// Seed used for the train/test shuffle unless overridden.
pub const DEFAULT_SEED: u64 = 15;

/// Share of rows held out for evaluation unless overridden.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Neighbour count unless overridden.
pub const DEFAULT_NEIGHBORS: usize = 5;

/// Knobs for [`train`](crate::train).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    pub seed: u64,
    pub test_fraction: f64,
    pub neighbors: usize,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            neighbors: DEFAULT_NEIGHBORS,
        }
    }
}

impl TrainingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Reject option combinations that cannot produce a split or a vote.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(TrainError::InvalidOptions(format!(
                "test fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.neighbors == 0 {
            return Err(TrainError::InvalidOptions(
                "neighbour count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let options = TrainingOptions::default();
        assert_eq!(options.seed, 15);
        assert_eq!(options.test_fraction, 0.2);
        assert_eq!(options.neighbors, 5);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let options = TrainingOptions::new()
            .with_seed(7)
            .with_test_fraction(0.25)
            .with_neighbors(3);
        assert_eq!(options.seed, 7);
        assert_eq!(options.test_fraction, 0.25);
        assert_eq!(options.neighbors, 3);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(TrainingOptions::new().with_test_fraction(0.0).validate().is_err());
        assert!(TrainingOptions::new().with_test_fraction(1.0).validate().is_err());
        assert!(TrainingOptions::new().with_test_fraction(f64::NAN).validate().is_err());
        assert!(TrainingOptions::new().with_neighbors(0).validate().is_err());
    }
}
