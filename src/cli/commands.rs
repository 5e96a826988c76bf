// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags.
//
// The defaults reproduce a full run with no flags at all:
// train on data/train.csv + data/training_extra.csv, checkpoint
// into checkpoints/, predict data/test.csv into predictions.csv.

use clap::{Args, Subcommand};

use crate::application::predict_use_case::PredictConfig;
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the price model on labelled CSV data
    Train(TrainArgs),

    /// Predict prices for a test CSV using a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Labelled CSV files, concatenated in order (repeat the flag)
    #[arg(
        long = "train-csv",
        default_values_t = [
            String::from("data/train.csv"),
            String::from("data/training_extra.csv"),
        ]
    )]
    pub train_csvs: Vec<String>,

    /// Directory for the checkpoint, config, artifacts, and metrics log
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Epoch budget; early stopping may end the run sooner
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Initial Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Multiplier applied to the learning rate on a validation plateau
    #[arg(long, default_value_t = 0.5)]
    pub lr_factor: f64,

    /// Non-improving epochs before the learning rate is reduced
    #[arg(long, default_value_t = 2)]
    pub lr_patience: usize,

    /// Consecutive non-improving epochs before training stops early
    #[arg(long, default_value_t = 3)]
    pub patience: usize,

    /// Fraction of rows held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Dropout probability between the fully connected blocks
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Seed for the shuffle-split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 -
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_csvs:     a.train_csvs,
            checkpoint_dir: a.checkpoint_dir,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            lr_factor:      a.lr_factor,
            lr_patience:    a.lr_patience,
            patience:       a.patience,
            val_fraction:   a.val_fraction,
            dropout:        a.dropout,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Test CSV (same schema as training files, without Price)
    #[arg(long, default_value = "data/test.csv")]
    pub test_csv: String,

    /// Directory where the checkpoint was saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Output CSV (`id,Price`, one row per test record)
    #[arg(long, default_value = "predictions.csv")]
    pub output: String,

    /// Inference batch size
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,
}

impl From<PredictArgs> for PredictConfig {
    fn from(a: PredictArgs) -> Self {
        PredictConfig {
            test_csv:       a.test_csv,
            checkpoint_dir: a.checkpoint_dir,
            output:         a.output,
            batch_size:     a.batch_size,
        }
    }
}
