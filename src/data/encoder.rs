// ============================================================
// Layer 4 - Categorical Encoder and Scaler
// ============================================================
// Turns imputed rows into model-ready numbers:
//
//   CodeTable  - maps each distinct categorical value to a dense
//                integer code (0, 1, 2, ... in first-seen order)
//   Scaler     - zero-mean / unit-variance transform for the
//                weight-capacity column
//
// Both are bundled into EncodingArtifacts, which is fit exactly
// once on the training corpus, saved as JSON next to the model
// checkpoint, and injected read-only into every later dataset
// construction. Training, validation, and test rows therefore
// share one set of code assignments and one pair of scaling
// parameters; nothing is ever refit.
//
// The same vocabulary-must-match rule applies here as to any
// learned lookup table: the embedding layers are sized from these
// code tables, so a code produced at prediction time must have
// existed at fit time. Values never seen during fitting map to
// the "Missing" sentinel, which always holds a code.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::imputer::{FilledRecord, ImputeStats, MISSING};
use crate::domain::record::BagRecord;

// ─── CodeTable ────────────────────────────────────────────────────────────────
/// Dense value-to-code table for one categorical column.
/// The code of a value is its index in `values`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeTable {
    /// Distinct values in first-seen order
    values: Vec<String>,
}

impl CodeTable {
    /// Build the table from column values in first-seen order. The
    /// "Missing" sentinel is appended if the data never produced it,
    /// so it always holds a code.
    fn fit<'a>(column: impl Iterator<Item = &'a str>) -> Self {
        let mut values: Vec<String> = Vec::new();
        for value in column {
            if !values.iter().any(|seen| seen == value) {
                values.push(value.to_string());
            }
        }
        if !values.iter().any(|seen| seen == MISSING) {
            values.push(MISSING.to_string());
        }
        Self { values }
    }

    /// Dense code for a value. Values unseen at fit time map to the
    /// "Missing" sentinel so every code stays inside the embedding
    /// range. Cardinalities are tiny (a handful of brands/colors),
    /// so a linear scan is fine.
    pub fn code_of(&self, value: &str) -> i64 {
        self.values
            .iter()
            .position(|v| v == value)
            .or_else(|| self.values.iter().position(|v| v == MISSING))
            .unwrap_or(0) as i64
    }

    /// Number of distinct codes, which is exactly the input
    /// cardinality the matching embedding table needs.
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }
}

// ─── Scaler ───────────────────────────────────────────────────────────────────
/// Zero-mean / unit-variance transform for one continuous column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean:   f32,
    pub stddev: f32,
}

impl Scaler {
    /// Fit mean and (population) standard deviation. A degenerate
    /// column falls back to stddev 1.0 so transform stays finite.
    fn fit(column: impl Iterator<Item = f32>) -> Self {
        let values: Vec<f32> = column.filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return Self { mean: 0.0, stddev: 1.0 };
        }

        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
        let stddev = variance.sqrt();

        let stddev = if stddev.is_finite() && stddev > 0.0 { stddev } else { 1.0 };
        Self { mean, stddev }
    }

    pub fn transform(&self, value: f32) -> f32 {
        (value - self.mean) / self.stddev
    }
}

// ─── EncodingArtifacts ────────────────────────────────────────────────────────
/// Everything the pipeline learns from the training corpus:
/// imputation medians, one code table per categorical column, and
/// the weight-capacity scaler. Immutable after `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingArtifacts {
    pub impute:   ImputeStats,
    pub brand:    CodeTable,
    pub material: CodeTable,
    pub style:    CodeTable,
    pub color:    CodeTable,
    pub scaler:   Scaler,
}

impl EncodingArtifacts {
    /// Fit every artifact on the given corpus: medians first, then
    /// code tables and the scaler over the imputed values.
    pub fn fit(records: &[BagRecord]) -> Result<Self> {
        if records.is_empty() {
            anyhow::bail!("cannot fit encoding artifacts on an empty record set");
        }

        let impute = ImputeStats::fit(records);
        let filled: Vec<FilledRecord> = records.iter().map(|r| impute.fill(r)).collect();

        let brand    = CodeTable::fit(filled.iter().map(|r| r.brand.as_str()));
        let material = CodeTable::fit(filled.iter().map(|r| r.material.as_str()));
        let style    = CodeTable::fit(filled.iter().map(|r| r.style.as_str()));
        let color    = CodeTable::fit(filled.iter().map(|r| r.color.as_str()));
        let scaler   = Scaler::fit(filled.iter().map(|r| r.weight_capacity));

        Ok(Self { impute, brand, material, style, color, scaler })
    }

    /// Per-column cardinalities in the fixed
    /// [brand, material, style, color] order, used to size the
    /// embedding tables.
    pub fn cardinalities(&self) -> [usize; 4] {
        [
            self.brand.cardinality(),
            self.material.cardinality(),
            self.style.cardinality(),
            self.color.cardinality(),
        ]
    }
}
