// ============================================================
// Layer 2 - Predict Use Case
// ============================================================
// Loads everything a prediction run needs from the checkpoint
// directory, encodes the test file with the training-time
// artifacts, runs batched inference, and writes the output CSV
// in test-file order.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{BagDataset, DatasetMode},
    loader::CsvLoader,
};
use crate::domain::traits::RecordSource;
use crate::infra::{checkpoint::CheckpointManager, predictions::PredictionWriter};
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictConfig {
    pub test_csv:       String,
    pub checkpoint_dir: String,
    /// Output CSV path (`id,Price`, one row per test record)
    pub output:         String,
    pub batch_size:     usize,
}

pub struct PredictUseCase {
    config: PredictConfig,
}

impl PredictUseCase {
    pub fn new(config: PredictConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // The artifacts fix both the encoding and the embedding table
        // sizes; without them the checkpoint is unusable.
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        let artifacts    = ckpt_manager.load_artifacts()?;

        let train_cfg = ckpt_manager.load_config()?;
        tracing::debug!(
            "Checkpoint comes from a run with lr={}, epoch budget {}",
            train_cfg.lr,
            train_cfg.epochs,
        );

        tracing::info!("Loading test rows from '{}'", cfg.test_csv);
        let loader  = CsvLoader::new([cfg.test_csv.clone()]);
        let records = loader.load_all()?;

        let dataset = BagDataset::build(&records, &artifacts, DatasetMode::Test)?;
        let samples = dataset.into_samples();

        let inferencer = Inferencer::from_checkpoint(&ckpt_manager, cfg.batch_size)?;
        let prices     = inferencer.predict(&samples)?;

        let ids: Vec<i64> = samples.iter().map(|s| s.id).collect();
        PredictionWriter::new(&cfg.output).write(&ids, &prices)?;

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Write};

    use crate::application::train_use_case::TrainConfig;
    use crate::data::encoder::EncodingArtifacts;
    use crate::domain::record::BagRecord;
    use crate::ml::model::{PriceModel, PriceModelConfig};
    use crate::ml::trainer::TrainingBackend;

    fn fitting_record(id: i64) -> BagRecord {
        BagRecord {
            id,
            brand: Some("Nike".into()),
            material: Some("Leather".into()),
            size: Some("Small".into()),
            compartments: Some(5.0),
            laptop_compartment: Some("Yes".into()),
            waterproof: Some("No".into()),
            style: Some("Tote".into()),
            color: Some("Black".into()),
            weight_capacity: Some(15.0),
            price: Some(90.0),
        }
    }

    #[test]
    fn test_end_to_end_prediction_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ckpt = CheckpointManager::new(dir.path());

        // A fitted pipeline plus an (untrained) checkpoint is enough
        // for the prediction path to run end to end.
        let artifacts = EncodingArtifacts::fit(&[fitting_record(0), fitting_record(1)])
            .expect("fit");
        ckpt.save_artifacts(&artifacts).expect("save artifacts");
        ckpt.save_config(&TrainConfig::default()).expect("save config");

        let [brand, material, style, color] = artifacts.cardinalities();
        let device = burn::backend::ndarray::NdArrayDevice::Cpu;
        let model: PriceModel<TrainingBackend> =
            PriceModelConfig::new(brand, material, style, color).init(&device);
        ckpt.save_best(&model).expect("save model");

        // Two test rows, no Price column, deliberately not in id order
        let test_csv = dir.path().join("test.csv");
        let mut f = fs::File::create(&test_csv).expect("create test csv");
        writeln!(
            f,
            "id,Brand,Material,Size,Compartments,Laptop Compartment,Waterproof,Style,Color,Weight Capacity (kg)"
        )
        .expect("header");
        writeln!(f, "300001,Nike,Leather,Small,5,Yes,No,Tote,Black,15.0").expect("row");
        writeln!(f, "300000,Jansport,Canvas,Large,3,No,Yes,Backpack,Pink,22.5").expect("row");
        drop(f);

        let output = dir.path().join("predictions.csv");
        let use_case = PredictUseCase::new(PredictConfig {
            test_csv:       test_csv.to_string_lossy().into_owned(),
            checkpoint_dir: dir.path().to_string_lossy().into_owned(),
            output:         output.to_string_lossy().into_owned(),
            batch_size:     128,
        });
        use_case.execute().expect("predict");

        let content = fs::read_to_string(&output).expect("read output");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,Price");
        // Input order preserved, not sorted by id
        assert!(lines[1].starts_with("300001,"));
        assert!(lines[2].starts_with("300000,"));
    }
}
