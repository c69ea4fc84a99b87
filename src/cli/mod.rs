// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train` — trains a QCNet on system directories
//   2. `eval`  — loads a checkpoint and prints its RMSE

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvalArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "qcnet-train",
    version = "0.1.0",
    about = "Train a QCNet regression model on per-system frame data."
)]
pub struct Cli {
    /// The subcommand to run (train or eval)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. Routing only.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Eval(args)  => run_eval(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on {} system(s)", args.data_dirs.len());

    let checkpoint = args.checkpoint.clone();
    let report     = TrainUseCase::new(args.into()).execute()?;

    match checkpoint {
        Some(path) => println!("Training complete. Checkpoint saved to {}.", path),
        None       => println!("Training complete. Final learning rate {:.3e}.", report.final_lr),
    }
    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    use crate::application::eval_use_case::EvalUseCase;

    let data_dirs = (!args.data_dirs.is_empty()).then_some(args.data_dirs);
    let report    = EvalUseCase::new(args.checkpoint, data_dirs, args.device.into()).execute()?;

    println!("# checkpoint epoch: {}", report.epoch);
    println!("trn_rmse  {:.6e}", report.trn_err);
    println!("tst_rmse  {:.6e}", report.tst_err);
    Ok(())
}
