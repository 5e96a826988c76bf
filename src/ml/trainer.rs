// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Per epoch:
//   - training pass over the training split: forward, MSE loss,
//     backward, Adam step per mini-batch
//   - validation pass over the held-out split on the inner
//     backend: model.valid() disables autodiff and dropout and
//     uses the batch-norm running statistics
//   - checkpoint if validation loss strictly improved, otherwise
//     bump the stall counters
//   - reduce the learning rate on a plateau (its own counter,
//     independent of early stopping)
//   - stop early after `patience` consecutive non-improving epochs
//
// Exhausting the epoch budget and stopping early are both normal
// termination.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{Context, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::BagBatcher, dataset::BagDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{PriceModel, PriceModelConfig};

/// CPU backend with autodiff, used for weight updates.
pub type TrainingBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Plain CPU backend, used for validation and prediction.
pub type InferenceBackend = burn::backend::NdArray;

/// What a finished run looked like.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub epochs_run:       usize,
    pub final_train_loss: f64,
    pub best_val_loss:    f64,
}

pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &PriceModelConfig,
    train_dataset: BagDataset,
    val_dataset:   BagDataset,
    ckpt_manager:  CheckpointManager,
) -> Result<TrainingOutcome> {
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: PriceModel<TrainingBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: embeddings sized [{}, {}, {}, {}]",
        model_cfg.brand_count,
        model_cfg.material_count,
        model_cfg.style_count,
        model_cfg.color_count,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();
    let mut lr    = cfg.lr;

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = BagBatcher::<TrainingBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend - no autodiff overhead) ──────────
    let val_batcher = BagBatcher::<InferenceBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

    let mut best_val_loss     = f64::INFINITY;
    let mut stalled_epochs    = 0usize; // early-stop counter
    let mut lr_stalled_epochs = 0usize; // plateau counter, independent of the above
    let mut epochs_run        = 0usize;
    let mut final_train_loss  = f64::NAN;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        epochs_run = epoch;

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let targets = batch
                .targets
                .context("training batch has no target prices")?;
            let (loss, _) =
                model.forward_loss(batch.categoricals, batch.numericals, targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };
        final_train_loss = avg_train_loss;

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() -> PriceModel<InferenceBackend>
        // dropout disabled, batch-norm running stats in use
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;

        for batch in val_loader.iter() {
            let targets = batch
                .targets
                .context("validation batch has no target prices")?;
            let (loss, _) =
                model_valid.forward_loss(batch.categoricals, batch.numericals, targets);

            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else { f64::NAN };

        println!(
            "Epoch {:>3}/{} | train_mse={:.4} | val_mse={:.4} | lr={:.6}",
            epoch, cfg.epochs, avg_train_loss, avg_val_loss, lr,
        );

        let row = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, lr);
        metrics.log(&row)?;

        // ── Checkpoint / stall bookkeeping ────────────────────────────────────
        if row.is_improvement(best_val_loss) {
            best_val_loss     = avg_val_loss;
            stalled_epochs    = 0;
            lr_stalled_epochs = 0;
            ckpt_manager.save_best(&model)?;
            tracing::info!("Validation improved to {:.4}; checkpoint saved", avg_val_loss);
        } else {
            stalled_epochs    += 1;
            lr_stalled_epochs += 1;

            if lr_stalled_epochs >= cfg.lr_patience {
                lr *= cfg.lr_factor;
                lr_stalled_epochs = 0;
                tracing::info!("Validation plateau: learning rate reduced to {:.6}", lr);
            }

            if stalled_epochs >= cfg.patience {
                tracing::info!(
                    "No improvement for {} epochs; stopping early at epoch {}",
                    cfg.patience,
                    epoch,
                );
                break;
            }
        }
    }

    tracing::info!(
        "Training finished after {} epoch(s); best validation MSE {:.4}",
        epochs_run,
        best_val_loss,
    );

    Ok(TrainingOutcome { epochs_run, final_train_loss, best_val_loss })
}
