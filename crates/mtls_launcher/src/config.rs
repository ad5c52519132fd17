//! Training Parameters
//!
//! The full parameter set handed to the trainer, its defaults, and JSON
//! persistence.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::dataset;

/// Grid side assumed when the training directory gives no hint.
pub const DEFAULT_GRID_SIDE: usize = 64;
/// Sample count assumed when a directory holds no samples.
pub const DEFAULT_SAMPLE_COUNT: usize = 1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrainingParams {
    // Directories
    pub dir_data_train: String,
    pub dir_target_train: String,
    pub dir_data_valid: String,
    pub dir_target_valid: String,
    pub dir_output: String,
    // Cube dimensions (Z, Y, X)
    pub n1: usize,
    pub n2: usize,
    pub n3: usize,
    // Dataset sizes
    pub ntrain: usize,
    pub nvalid: usize,
    // Schedule
    pub epochs: usize,
    pub batch_train: usize,
    // Toggles
    pub use_gpu: bool,
    pub rgt: bool,
    pub dhr: bool,
    pub fault: bool,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            dir_data_train: "train/dataset3/data_train".to_string(),
            dir_target_train: "train/dataset3/target_train".to_string(),
            dir_data_valid: "train/dataset3/data_valid".to_string(),
            dir_target_valid: "train/dataset3/target_valid".to_string(),
            dir_output: "result3_infer".to_string(),
            n1: DEFAULT_GRID_SIDE,
            n2: DEFAULT_GRID_SIDE,
            n3: DEFAULT_GRID_SIDE,
            ntrain: DEFAULT_SAMPLE_COUNT,
            nvalid: DEFAULT_SAMPLE_COUNT,
            epochs: 100,
            batch_train: 4,
            use_gpu: true,
            rgt: true,
            dhr: true,
            fault: true,
        }
    }
}

impl TrainingParams {
    /// `base` with dimensions and set sizes taken from the data directories.
    ///
    /// The training grid side also seeds the validation fallback, so an
    /// empty validation folder never disagrees with the training cubes.
    pub fn detected(base: TrainingParams) -> Self {
        let train = dataset::detect(
            &base.dir_data_train,
            DEFAULT_SAMPLE_COUNT,
            DEFAULT_GRID_SIDE,
        );
        let valid = dataset::detect(&base.dir_data_valid, DEFAULT_SAMPLE_COUNT, train.grid_side);

        info!(
            "Detected dataset: {} train / {} valid samples, grid {}^3",
            train.sample_count, valid.sample_count, train.grid_side
        );

        Self {
            n1: train.grid_side,
            n2: train.grid_side,
            n3: train.grid_side,
            ntrain: train.sample_count,
            nvalid: valid.sample_count,
            ..base
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameters from {:?}", path))?;
        let params: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid parameter file {:?}", path))?;
        params.validate()?;
        Ok(params)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to save parameters to {:?}", path))?;
        info!("Parameters saved to {:?}", path);
        Ok(())
    }

    /// Reject zero where the trainer needs a positive integer.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("n1", self.n1),
            ("n2", self.n2),
            ("n3", self.n3),
            ("ntrain", self.ntrain),
            ("nvalid", self.nvalid),
            ("epochs", self.epochs),
            ("batch_train", self.batch_train),
        ];
        for (name, value) in counts {
            if value == 0 {
                bail!("'{}' must be a positive integer", name);
            }
        }
        Ok(())
    }
}
