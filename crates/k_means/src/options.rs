// This software is licensed under a dual license model:
//
// GNU Affero General Public License v3 (AGPLv3): You may use, modify, and
// distribute this software under the terms of the AGPLv3.
//
// Elastic License v2 (ELv2): You may also use, modify, and distribute this
// software under the Elastic License v2, which has specific restrictions.
//
// We welcome any commercial collaboration or support. For inquiries
// regarding the licenses, please contact us at:
// vectorchord-inquiry@tensorchord.ai
//
// Copyright (c) 2025 TensorChord Inc.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct KMeansOptions {
    /// Number of clusters.
    #[validate(range(min = 1, max = 16777216))]
    pub k: u32,
    /// Hard cap on Lloyd iterations; the run always stops after this many.
    #[serde(default = "KMeansOptions::default_max_iterations")]
    #[validate(range(min = 1))]
    pub max_iterations: usize,
    /// The run has converged once at most `change_threshold * n` labels
    /// changed in an iteration. `0.0` demands a fixed point.
    #[serde(default = "KMeansOptions::default_change_threshold")]
    #[validate(custom(function = KMeansOptions::validate_change_threshold))]
    pub change_threshold: f64,
    /// Worker threads, `0` for the available hardware parallelism.
    #[serde(default = "KMeansOptions::default_num_threads")]
    #[validate(range(max = 255))]
    pub num_threads: u16,
    #[serde(default = "KMeansOptions::default_seed")]
    pub seed: u64,
}

impl KMeansOptions {
    pub fn new(k: u32) -> Self {
        Self {
            k,
            max_iterations: Self::default_max_iterations(),
            change_threshold: Self::default_change_threshold(),
            num_threads: Self::default_num_threads(),
            seed: Self::default_seed(),
        }
    }
    fn default_max_iterations() -> usize {
        100
    }
    fn default_change_threshold() -> f64 {
        0.0
    }
    fn validate_change_threshold(change_threshold: f64) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&change_threshold) {
            return Err(ValidationError::new(
                "`change_threshold` should be a fraction between 0 and 1",
            ));
        }
        Ok(())
    }
    fn default_num_threads() -> u16 {
        0
    }
    fn default_seed() -> u64 {
        7
    }

    /// Worker count after resolving `0` to the hardware parallelism.
    pub fn threads(&self) -> usize {
        match self.num_threads {
            0 => std::thread::available_parallelism().map_or(1, |x| x.get()),
            n => n as usize,
        }
    }

    /// Largest number of label changes that still counts as converged.
    pub fn tolerated_changes(&self, n: usize) -> usize {
        (self.change_threshold * n as f64).floor() as usize
    }
}
