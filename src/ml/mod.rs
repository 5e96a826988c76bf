// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// This layer contains all Burn framework specific code apart
// from the data pipeline's Dataset/Batcher implementations.
//
// What's in this layer:
//
//   model.rs      - The embedding + feed-forward regressor
//                   One embedding table per categorical column,
//                   concatenated with the numerical features and
//                   passed through a 256 -> 128 -> 64 -> 1 stack
//                   with ReLU, batch normalization, and dropout.
//
//   trainer.rs    - The training loop
//                   Forward pass, MSE loss, backward pass, Adam
//                   step, per-epoch validation, best-checkpoint
//                   saving, plateau LR decay, and early stopping.
//
//   inferencer.rs - The inference engine
//                   Rebuilds the model from the saved artifacts,
//                   loads the best checkpoint, and runs batched
//                   predictions in input order.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Embedding + feed-forward price regression model
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine - loads a checkpoint and predicts prices
pub mod inferencer;
