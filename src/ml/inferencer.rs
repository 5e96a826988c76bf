// ============================================================
// Layer 5 - Inferencer
// ============================================================
use anyhow::Result;
use burn::data::dataloader::batcher::Batcher;

use crate::data::batcher::BagBatcher;
use crate::data::dataset::BagSample;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{PriceModel, PriceModelConfig};
use crate::ml::trainer::InferenceBackend;

pub struct Inferencer {
    model:      PriceModel<InferenceBackend>,
    batcher:    BagBatcher<InferenceBackend>,
    batch_size: usize,
}

impl Inferencer {
    /// Rebuild the model from the persisted artifacts (they fix the
    /// embedding table sizes) and load the best checkpoint into it.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        batch_size:   usize,
    ) -> Result<Self> {
        let device = burn::backend::ndarray::NdArrayDevice::Cpu;

        let artifacts = ckpt_manager.load_artifacts()?;
        let [brand, material, style, color] = artifacts.cardinalities();

        // Dropout zeroed: inference must be deterministic
        let model_cfg = PriceModelConfig::new(brand, material, style, color)
            .with_dropout(0.0);
        let model: PriceModel<InferenceBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_best(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self {
            model,
            batcher: BagBatcher::new(device),
            batch_size: batch_size.max(1),
        })
    }

    /// Batched forward passes over the samples. Predictions come back
    /// in input order, one per sample.
    pub fn predict(&self, samples: &[BagSample]) -> Result<Vec<f32>> {
        let mut predictions = Vec::with_capacity(samples.len());

        for chunk in samples.chunks(self.batch_size) {
            let batch  = self.batcher.batch(chunk.to_vec());
            let output = self.model.forward(batch.categoricals, batch.numericals);

            let values: Vec<f32> = output
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow::anyhow!("cannot read prediction tensor: {e:?}"))?;
            predictions.extend(values);
        }

        Ok(predictions)
    }
}
