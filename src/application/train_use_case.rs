// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load labelled CSV rows       (Layer 4 - data)
//   Step 2: Fit encoding artifacts       (Layer 4 - data)
//   Step 3: Encode the full dataset      (Layer 4 - data)
//   Step 4: Split train/validation       (Layer 4 - data)
//   Step 5: Save config + artifacts      (Layer 6 - infra)
//   Step 6: Run training loop            (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{BagDataset, DatasetMode},
    encoder::EncodingArtifacts,
    loader::CsvLoader,
    splitter::split_train_val,
};
use crate::domain::traits::RecordSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::PriceModelConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so it can be
// saved next to the checkpoint and inspected later. There is no
// other configuration state anywhere; everything a run needs is in
// this one struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Labelled input files, concatenated in order
    pub train_csvs:     Vec<String>,
    pub checkpoint_dir: String,
    pub batch_size:     usize,
    /// Epoch budget; early stopping may end the run sooner
    pub epochs:         usize,
    pub lr:             f64,
    /// Multiplier applied to the learning rate on a plateau
    pub lr_factor:      f64,
    /// Non-improving epochs before the learning rate is reduced
    pub lr_patience:    usize,
    /// Consecutive non-improving epochs before training stops early
    pub patience:       usize,
    /// Fraction of rows held out for validation
    pub val_fraction:   f64,
    pub dropout:        f64,
    /// Seed for the shuffle-split and batch shuffling
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_csvs:     vec![
                "data/train.csv".to_string(),
                "data/training_extra.csv".to_string(),
            ],
            checkpoint_dir: "checkpoints".to_string(),
            batch_size:     128,
            epochs:         20,
            lr:             1e-3,
            lr_factor:      0.5,
            lr_patience:    2,
            patience:       3,
            val_fraction:   0.2,
            dropout:        0.1,
            seed:           42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load labelled rows ────────────────────────────────────────
        tracing::info!("Loading training rows from {:?}", cfg.train_csvs);
        let loader  = CsvLoader::new(cfg.train_csvs.iter().cloned());
        let records = loader.load_all()?;

        // ── Step 2: Fit encoding artifacts on the full training corpus ────────
        // These are fit exactly once; validation and (later) test rows
        // are encoded against them, never refit.
        let artifacts = EncodingArtifacts::fit(&records)?;
        let [brand, material, style, color] = artifacts.cardinalities();
        tracing::info!(
            "Fitted code tables: brand={}, material={}, style={}, color={}",
            brand, material, style, color,
        );

        // ── Step 3: Encode every row ──────────────────────────────────────────
        let dataset = BagDataset::build(&records, &artifacts, DatasetMode::Train)?;

        // ── Step 4: Train / validation split ──────────────────────────────────
        let (train_samples, val_samples) =
            split_train_val(dataset.into_samples(), 1.0 - cfg.val_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len(),
        );

        let train_dataset = BagDataset::from_samples(train_samples);
        let val_dataset   = BagDataset::from_samples(val_samples);

        // ── Step 5: Persist config and artifacts ──────────────────────────────
        // The predict use case rebuilds the model and the encoding
        // from these two files.
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        ckpt_manager.save_artifacts(&artifacts)?;

        // ── Step 6: Run training loop (Layer 5) ───────────────────────────────
        let model_cfg = PriceModelConfig::new(brand, material, style, color)
            .with_dropout(cfg.dropout);
        let outcome = run_training(cfg, &model_cfg, train_dataset, val_dataset, ckpt_manager)?;

        tracing::info!(
            "Best validation MSE {:.4} after {} epoch(s)",
            outcome.best_val_loss,
            outcome.epochs_run,
        );
        Ok(())
    }
}
