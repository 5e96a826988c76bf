// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved in the checkpoint directory:
//   1. best_model.mpk       - weights of the best epoch so far,
//                             overwritten on every improvement
//   2. train_config.json    - the hyperparameters of the run
//   3. artifacts.json       - imputation medians, code tables,
//                             and the weight-capacity scaler
//
// The artifacts file is as load-bearing as the weights: the
// embedding tables are sized from the code-table cardinalities,
// and prediction must encode rows with the exact tables the model
// was trained against. Loading fails if the stored shapes don't
// match the freshly constructed model.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::encoder::EncodingArtifacts;
use crate::ml::model::PriceModel;

/// Fixed checkpoint identifier; the recorder appends its extension.
const BEST_MODEL: &str = "best_model";
const CONFIG_FILE: &str = "train_config.json";
const ARTIFACTS_FILE: &str = "artifacts.json";

/// Manages saving and loading of everything a prediction run needs.
/// All files live in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Overwrite the best-model snapshot with the current weights.
    pub fn save_best<B: AutodiffBackend>(&self, model: &PriceModel<B>) -> Result<()> {
        let path = self.dir.join(BEST_MODEL);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        tracing::debug!("Saved best checkpoint");
        Ok(())
    }

    /// Load the best snapshot into a freshly constructed model.
    /// The model must have the same architecture as the one that was
    /// saved, or loading fails.
    pub fn load_best<B: Backend>(
        &self,
        model:  PriceModel<B>,
        device: &B::Device,
    ) -> Result<PriceModel<B>> {
        let path = self.dir.join(BEST_MODEL);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'predict'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Save the fitted encoding artifacts to JSON.
    /// Called once, before training starts.
    pub fn save_artifacts(&self, artifacts: &EncodingArtifacts) -> Result<()> {
        let path = self.dir.join(ARTIFACTS_FILE);
        let json = serde_json::to_string_pretty(artifacts)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write artifacts to '{}'", path.display()))?;

        tracing::debug!("Saved encoding artifacts to '{}'", path.display());
        Ok(())
    }

    /// Load the fitted encoding artifacts from JSON.
    /// Called by the predict use case so test rows are encoded with
    /// the training-time code tables and scaler.
    pub fn load_artifacts(&self) -> Result<EncodingArtifacts> {
        let path = self.dir.join(ARTIFACTS_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read artifacts from '{}'. \
                     Make sure you have run 'train' before 'predict'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }
}
