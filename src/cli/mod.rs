// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Uses the `clap`
// crate to parse arguments; all business logic is delegated to
// Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   - fits the pipeline and trains the price model
//   2. `predict` - loads a checkpoint and writes predictions.csv
//
// Reference: Rust Book §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

/// The main CLI struct - clap reads the fields and generates
/// argument parsing code via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "backpack-price",
    version = "0.1.0",
    about = "Train an embedding + feed-forward network on backpack data, then predict prices."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin - it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => Self::run_train(args),
            Commands::Predict(args) => Self::run_predict(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on: {:?}", args.train_csvs);

        // Convert CLI args -> application config at the boundary
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let output = args.output.clone();
        let use_case = PredictUseCase::new(args.into());
        use_case.execute()?;

        println!("Predictions written to {}.", output);
        Ok(())
    }
}
