// ============================================================
// Layer 4 - Bag Dataset
// ============================================================
// A fixed-size, randomly-indexable collection of encoded samples
// implementing Burn's Dataset trait, so the DataLoader can call
// .get(index) and .len() on it.
//
// Construction runs impute -> encode -> scale against a set of
// injected (already fitted) artifacts and splits each row into a
// categorical-code vector, a numerical-feature vector, and an
// optional target. Column order inside the vectors is fixed:
//
//   categorical = [brand, material, style, color]
//   numerical   = [size, compartments, laptop-compartment,
//                  waterproof, weight-capacity]
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use anyhow::Result;
use burn::data::dataset::Dataset;

use crate::data::encoder::EncodingArtifacts;
use crate::domain::record::BagRecord;

/// Number of categorical feature columns per sample.
pub const CATEGORICAL_COLUMNS: usize = 4;

/// Number of numerical feature columns per sample.
pub const NUMERICAL_COLUMNS: usize = 5;

/// Whether a dataset carries targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetMode {
    /// Every row must have a price; a missing one is an error.
    Train,
    /// Prices are ignored even if present.
    Test,
}

/// One fully encoded row, ready for batching.
#[derive(Debug, Clone)]
pub struct BagSample {
    /// Row identifier, preserved for the prediction output
    pub id: i64,

    /// Dense codes in [brand, material, style, color] order
    pub categoricals: [i64; CATEGORICAL_COLUMNS],

    /// [size, compartments, laptop-compartment, waterproof,
    /// weight-capacity] with the last entry already scaled
    pub numericals: [f32; NUMERICAL_COLUMNS],

    /// Target price; None in test mode
    pub price: Option<f32>,
}

#[derive(Debug)]
pub struct BagDataset {
    samples: Vec<BagSample>,
}

impl BagDataset {
    /// Encode rows against the injected artifacts.
    pub fn build(
        records: &[BagRecord],
        artifacts: &EncodingArtifacts,
        mode: DatasetMode,
    ) -> Result<Self> {
        let mut samples = Vec::with_capacity(records.len());

        for record in records {
            let filled = artifacts.impute.fill(record);

            let price = match (mode, filled.price) {
                (DatasetMode::Train, None) => anyhow::bail!(
                    "row id {} has no price but the dataset is in training mode",
                    record.id
                ),
                (DatasetMode::Train, some) => some,
                (DatasetMode::Test, _) => None,
            };

            samples.push(BagSample {
                id: filled.id,
                categoricals: [
                    artifacts.brand.code_of(&filled.brand),
                    artifacts.material.code_of(&filled.material),
                    artifacts.style.code_of(&filled.style),
                    artifacts.color.code_of(&filled.color),
                ],
                numericals: [
                    filled.size,
                    filled.compartments,
                    filled.laptop_compartment,
                    filled.waterproof,
                    artifacts.scaler.transform(filled.weight_capacity),
                ],
                price,
            });
        }

        Ok(Self { samples })
    }

    /// Wrap already-encoded samples (used after the train/val split).
    pub fn from_samples(samples: Vec<BagSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[BagSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<BagSample> {
        self.samples
    }
}

impl Dataset<BagSample> for BagDataset {
    fn get(&self, index: usize) -> Option<BagSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Three rows, one null in each imputed column somewhere, three
    /// distinct values per categorical column.
    fn synthetic_records() -> Vec<BagRecord> {
        vec![
            BagRecord {
                id: 0,
                brand: None, // -> Missing
                material: Some("Leather".into()),
                size: Some("Small".into()),
                compartments: Some(2.0),
                laptop_compartment: Some("Yes".into()),
                waterproof: Some("No".into()),
                style: Some("Tote".into()),
                color: Some("Black".into()),
                weight_capacity: Some(10.0),
                price: Some(100.0),
            },
            BagRecord {
                id: 1,
                brand: Some("Nike".into()),
                material: None, // -> Missing
                size: None,     // -> ordinal 0
                compartments: None, // -> median
                laptop_compartment: None, // -> No
                waterproof: Some("Yes".into()),
                style: Some("Messenger".into()),
                color: None, // -> Missing
                weight_capacity: Some(20.0),
                price: Some(50.0),
            },
            BagRecord {
                id: 2,
                brand: Some("Puma".into()),
                material: Some("Canvas".into()),
                size: Some("Large".into()),
                compartments: Some(8.0),
                laptop_compartment: Some("No".into()),
                waterproof: None, // -> No
                style: Some("Backpack".into()),
                color: Some("Red".into()),
                weight_capacity: None, // -> median
                price: Some(75.0),
            },
        ]
    }

    #[test]
    fn test_length_matches_row_count_in_both_modes() {
        let records = synthetic_records();
        let artifacts = EncodingArtifacts::fit(&records).expect("fit");

        let train = BagDataset::build(&records, &artifacts, DatasetMode::Train).expect("train");
        let test = BagDataset::build(&records, &artifacts, DatasetMode::Test).expect("test");

        assert_eq!(train.len(), records.len());
        assert_eq!(test.len(), records.len());
        assert!(train.get(records.len()).is_none());
    }

    #[test]
    fn test_no_nulls_survive_and_codes_are_dense() {
        let records = synthetic_records();
        let artifacts = EncodingArtifacts::fit(&records).expect("fit");
        let dataset = BagDataset::build(&records, &artifacts, DatasetMode::Train).expect("build");

        for sample in dataset.samples() {
            // Every numerical feature is a concrete, finite number
            for value in sample.numericals {
                assert!(value.is_finite());
            }
            // Each categorical column saw 3 distinct values, so every
            // code must fall in {0, 1, 2}
            for code in sample.categoricals {
                assert!((0..3).contains(&code));
            }
            assert!(sample.price.is_some());
        }
    }

    #[test]
    fn test_feature_vector_ordering() {
        let records = synthetic_records();
        let artifacts = EncodingArtifacts::fit(&records).expect("fit");
        let dataset = BagDataset::build(&records, &artifacts, DatasetMode::Train).expect("build");

        let first = &dataset.samples()[0];
        // Row 0: Small -> -1, 2 compartments, laptop Yes, waterproof No
        assert_eq!(first.numericals[0], -1.0);
        assert_eq!(first.numericals[1], 2.0);
        assert_eq!(first.numericals[2], 1.0);
        assert_eq!(first.numericals[3], 0.0);
        // Weight capacity is scaled, not raw
        assert_ne!(first.numericals[4], 10.0);
    }

    #[test]
    fn test_train_mode_rejects_missing_price() {
        let mut records = synthetic_records();
        records[1].price = None;
        let artifacts = EncodingArtifacts::fit(&records).expect("fit");

        let err = BagDataset::build(&records, &artifacts, DatasetMode::Train).unwrap_err();
        assert!(err.to_string().contains("id 1"));

        // The same rows are fine in test mode
        let test = BagDataset::build(&records, &artifacts, DatasetMode::Test).expect("test");
        assert!(test.samples().iter().all(|s| s.price.is_none()));
    }

    #[test]
    fn test_injected_artifacts_keep_codes_stable() {
        let records = synthetic_records();
        let artifacts = EncodingArtifacts::fit(&records).expect("fit");

        // A "test file" with the rows in a different order still gets
        // the training-time code assignments
        let reversed: Vec<BagRecord> = records.iter().rev().cloned().collect();
        let train = BagDataset::build(&records, &artifacts, DatasetMode::Train).expect("train");
        let test = BagDataset::build(&reversed, &artifacts, DatasetMode::Test).expect("test");

        assert_eq!(
            train.samples()[0].categoricals,
            test.samples()[records.len() - 1].categoricals
        );
    }
}
