// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from raw CSV files to tensor batches.
//
// The pipeline flows in this order:
//
//   train.csv / training_extra.csv / test.csv
//       │
//       ▼
//   CsvLoader          -> typed rows, header validation
//       │
//       ▼
//   ImputeStats        -> fills nulls with fixed per-column rules
//       │
//       ▼
//   EncodingArtifacts  -> dense categorical codes + scaled weights
//       │
//       ▼
//   BagDataset         -> implements Burn's Dataset trait
//       │
//       ▼
//   BagBatcher         -> stacks samples into tensor batches
//       │
//       ▼
//   DataLoader         -> feeds batches to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads and validates CSV files using the csv crate
pub mod loader;

/// Fills missing values with fixed per-column rules
pub mod imputer;

/// Code tables, the weight-capacity scaler, and the fitted artifacts
pub mod encoder;

/// Implements Burn's Dataset trait for encoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits samples into train/validation sets
pub mod splitter;
