// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average MSE over training batches
//   - val_loss:   average MSE over validation batches
//   - lr:         the learning rate used for the epoch
//
// Output file: <checkpoint_dir>/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,val_loss,lr
//   1,1520.124500,1489.089200,0.001000
//   2,1320.890100,1354.854300,0.001000
//   ...

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average mean-squared-error over all training batches
    pub train_loss: f64,

    /// Average mean-squared-error on the validation set.
    /// Divergence from train_loss indicates overfitting.
    pub val_loss: f64,

    /// Learning rate in effect during this epoch
    pub lr: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, lr: f64) -> Self {
        Self { epoch, train_loss, val_loss, lr }
    }

    /// True if this epoch strictly improved on the previous best
    /// validation loss. A NaN validation loss never improves.
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet, so a
    /// resumed run appends to the existing log.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,lr")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.val_loss, m.lr,
        )?;

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 1400.0, 1320.0, 1e-3);
        assert!(m.is_improvement(1500.0));
        assert!(!m.is_improvement(1300.0));
        // Strict: equal is not an improvement
        assert!(!m.is_improvement(1320.0));
    }

    #[test]
    fn test_nan_never_improves() {
        let m = EpochMetrics::new(1, f64::NAN, f64::NAN, 1e-3);
        assert!(!m.is_improvement(f64::INFINITY));
    }

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempfile::tempdir().expect("tempdir");

        let logger = MetricsLogger::new(dir.path()).expect("create");
        logger.log(&EpochMetrics::new(1, 2.0, 3.0, 1e-3)).expect("log");

        // Re-opening must not duplicate the header
        let logger = MetricsLogger::new(dir.path()).expect("reopen");
        logger.log(&EpochMetrics::new(2, 1.5, 2.5, 1e-3)).expect("log");

        let content = fs::read_to_string(logger.csv_path()).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,val_loss,lr");
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("2,"));
    }
}
