// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns:
//
//   checkpoint.rs  - Saving and loading model weights under a
//                    fixed name via Burn's CompactRecorder, plus
//                    the training config and the fitted encoding
//                    artifacts as JSON. The artifacts are what
//                    make prediction-time encoding identical to
//                    training-time encoding.
//
//   metrics.rs     - Appends per-epoch training metrics (losses,
//                    learning rate) to a CSV file.
//
//   predictions.rs - Writes the final id,Price output CSV in
//                    test-file order.
//
// Reference: Rust Book §9 (Error Handling)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint, config, and artifact persistence
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Prediction output CSV writer
pub mod predictions;
