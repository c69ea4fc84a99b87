// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `eval`, and their flags.
// Defaults mirror TrainConfig::default().

use clap::{Args, Subcommand, ValueEnum};
use crate::application::train_use_case::TrainConfig;
use crate::ml::backend::DeviceKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a QCNet on one or more system directories
    Train(TrainArgs),

    /// Report the errors of a saved checkpoint
    Eval(EvalArgs),
}

/// Compute device accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum DeviceArg {
    #[default]
    Cpu,
    Gpu,
}

impl From<DeviceArg> for DeviceKind {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Cpu => DeviceKind::Cpu,
            DeviceArg::Gpu => DeviceKind::Gpu,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// System directories, each holding a system.json
    #[arg(long = "data", required = true, num_args = 1..)]
    pub data_dirs: Vec<String>,

    /// Frames per training batch
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Learning rate for the first `decay_steps` epochs
    #[arg(long, default_value_t = 3e-4)]
    pub start_lr: f64,

    /// Epochs between learning rate decays
    #[arg(long, default_value_t = 10)]
    pub decay_steps: usize,

    /// Multiplier applied at every decay
    #[arg(long, default_value_t = 0.96)]
    pub decay_rate: f64,

    /// Print a row every this many epochs
    #[arg(long, default_value_t = 1)]
    pub display_epoch: usize,

    /// Checkpoint path stem, overwritten after every epoch
    #[arg(long)]
    pub checkpoint: Option<String>,

    /// Append every printed row to this CSV file
    #[arg(long)]
    pub metrics_csv: Option<String>,

    #[arg(long, value_enum, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,

    /// Hidden widths of the embedding net, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [5, 10, 10])]
    pub embed_layers: Vec<usize>,

    /// Hidden widths of the fitting net, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [120, 120, 120])]
    pub fit_layers: Vec<usize>,

    /// Fraction of each system's frames held out for evaluation
    #[arg(long, default_value_t = 0.1)]
    pub test_ratio: f64,

    /// Seed for the split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dirs:     a.data_dirs,
            checkpoint:    a.checkpoint,
            metrics_csv:   a.metrics_csv,
            device:        a.device.into(),
            batch_size:    a.batch_size,
            test_ratio:    a.test_ratio,
            seed:          a.seed,
            epochs:        a.epochs,
            start_lr:      a.start_lr,
            decay_steps:   a.decay_steps,
            decay_rate:    a.decay_rate,
            display_epoch: a.display_epoch,
            embed_layers:  a.embed_layers,
            fit_layers:    a.fit_layers,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Checkpoint path stem given to `train --checkpoint`
    #[arg(long)]
    pub checkpoint: String,

    /// Evaluate on these directories instead of the recorded ones
    #[arg(long = "data", num_args = 1..)]
    pub data_dirs: Vec<String>,

    #[arg(long, value_enum, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config() {
        let cli = Cli::try_parse_from(["qcnet-train", "train", "--data", "sys"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();

        assert_eq!(cfg.data_dirs, vec!["sys".to_string()]);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.start_lr, def.start_lr);
        assert_eq!(cfg.decay_steps, def.decay_steps);
        assert_eq!(cfg.decay_rate, def.decay_rate);
        assert_eq!(cfg.display_epoch, def.display_epoch);
        assert_eq!(cfg.embed_layers, def.embed_layers);
        assert_eq!(cfg.fit_layers, def.fit_layers);
        assert_eq!(cfg.device, DeviceKind::Cpu);
        assert!(cfg.checkpoint.is_none());
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from([
            "qcnet-train", "train",
            "--data", "a", "b",
            "--embed-layers", "2,4",
            "--device", "gpu",
            "--checkpoint", "out/qcnet",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.data_dirs, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(cfg.embed_layers, vec![2, 4]);
        assert_eq!(cfg.device, DeviceKind::Gpu);
        assert_eq!(cfg.checkpoint.as_deref(), Some("out/qcnet"));
    }

    #[test]
    fn test_train_requires_data() {
        assert!(Cli::try_parse_from(["qcnet-train", "train"]).is_err());
    }

    #[test]
    fn test_eval_data_is_optional() {
        let cli = Cli::try_parse_from(["qcnet-train", "eval", "--checkpoint", "c"]).unwrap();
        let Commands::Eval(args) = cli.command else { panic!("expected eval") };
        assert!(args.data_dirs.is_empty());
    }
}
