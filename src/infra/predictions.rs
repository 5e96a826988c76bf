// ============================================================
// Layer 6 - Prediction Writer
// ============================================================
// Emits the final output CSV: one `id,Price` row per test record,
// in the same order the test file was read.

use anyhow::{Context, Result};
use std::{fs, io::Write, path::PathBuf};

pub struct PredictionWriter {
    path: PathBuf,
}

impl PredictionWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write one row per (id, price) pair, preserving the order given.
    pub fn write(&self, ids: &[i64], prices: &[f32]) -> Result<()> {
        if ids.len() != prices.len() {
            anyhow::bail!(
                "id/prediction count mismatch: {} ids, {} predictions",
                ids.len(),
                prices.len(),
            );
        }

        let mut f = fs::File::create(&self.path)
            .with_context(|| format!("Cannot create '{}'", self.path.display()))?;

        writeln!(f, "id,Price")?;
        for (id, price) in ids.iter().zip(prices) {
            writeln!(f, "{},{}", id, price)?;
        }

        tracing::info!("Wrote {} predictions to '{}'", ids.len(), self.path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_rows_in_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("predictions.csv");

        PredictionWriter::new(&path)
            .write(&[300001, 300000], &[81.5, 77.25])
            .expect("write");

        let content = fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["id,Price", "300001,81.5", "300000,77.25"]);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("predictions.csv");

        let err = PredictionWriter::new(&path)
            .write(&[1, 2], &[10.0])
            .unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }
}
