// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a training run in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load and split the systems    (Layer 4 - data)
//   Step 3: Build the QCNet               (Layer 5 - ml)
//   Step 4: Save configs for `eval`       (Layer 6 - infra)
//   Step 5: Run the training loop         (Layer 5 - ml)
//
// The backend is picked here from `config.device` and passed down
// as a type parameter, so nothing below this layer hardcodes one.

use anyhow::{ensure, Result};
use burn::tensor::backend::AutodiffBackend;
use serde::{Deserialize, Serialize};

use crate::data::reader::GroupReader;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    backend::{CpuTrainBackend, DeviceKind, GpuTrainBackend},
    model::{QcNet, QcNetConfig},
    trainer::{train, TrainReport},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings of a training run. Saved next to the checkpoint so
// `eval` can rebuild the same reader split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dirs:     Vec<String>,
    pub checkpoint:    Option<String>,
    pub metrics_csv:   Option<String>,
    pub device:        DeviceKind,
    pub batch_size:    usize,
    pub test_ratio:    f64,
    pub seed:          u64,
    pub epochs:        usize,
    pub start_lr:      f64,
    pub decay_steps:   usize,
    pub decay_rate:    f64,
    pub display_epoch: usize,
    pub embed_layers:  Vec<usize>,
    pub fit_layers:    Vec<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dirs:     Vec::new(),
            checkpoint:    None,
            metrics_csv:   None,
            device:        DeviceKind::Cpu,
            batch_size:    32,
            test_ratio:    0.1,
            seed:          42,
            epochs:        10,
            start_lr:      3e-4,
            decay_steps:   10,
            decay_rate:    0.96,
            display_epoch: 1,
            embed_layers:  vec![5, 10, 10],
            fit_layers:    vec![120, 120, 120],
        }
    }
}

impl TrainConfig {
    /// Check the loop hyperparameters. Reader settings are checked
    /// by the reader itself.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.epochs > 0, "epochs must be positive");
        ensure!(self.display_epoch > 0, "display epoch must be positive");
        ensure!(self.decay_steps > 0, "decay steps must be positive");
        ensure!(
            self.start_lr > 0.0 && self.start_lr.is_finite(),
            "start learning rate must be positive, got {}",
            self.start_lr
        );
        ensure!(
            self.decay_rate > 0.0 && self.decay_rate <= 1.0,
            "decay rate must be in (0, 1], got {}",
            self.decay_rate
        );
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline on the configured device.
    pub fn execute(&self) -> Result<TrainReport> {
        match self.config.device {
            DeviceKind::Cpu => self.run::<CpuTrainBackend>(&DeviceKind::cpu_device()),
            DeviceKind::Gpu => self.run::<GpuTrainBackend>(&DeviceKind::gpu_device()),
        }
    }

    fn run<B: AutodiffBackend>(&self, device: &B::Device) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;
        ensure!(!cfg.data_dirs.is_empty(), "no data directories given");

        // ── Step 2: Reader ────────────────────────────────────────────────────
        tracing::info!("Loading {} systems for training on {}", cfg.data_dirs.len(), cfg.device);
        let mut reader =
            GroupReader::new(&cfg.data_dirs, cfg.batch_size, cfg.test_ratio, cfg.seed)?;
        tracing::debug!("Systems: {:?}", reader.system_names().collect::<Vec<_>>());

        // ── Step 3: Model ─────────────────────────────────────────────────────
        // Input and output widths come from the data, hidden widths from the config.
        let layout    = reader.layout();
        let model_cfg = QcNetConfig::new(
            layout.n_desc(),
            cfg.embed_layers.clone(),
            cfg.fit_layers.clone(),
        )
        .with_n_out(layout.label_width);
        let model: QcNet<B> = model_cfg.init(device);
        tracing::info!(
            "QCNet ready: n_desc={}, embed={:?}, fit={:?}, n_out={}",
            model_cfg.n_desc,
            model_cfg.embed_layers,
            model_cfg.fit_layers,
            model_cfg.n_out
        );

        // ── Step 4: Checkpoint / metrics sinks ────────────────────────────────
        let ckpt = cfg.checkpoint.as_ref().map(CheckpointManager::new);
        if let Some(ckpt) = &ckpt {
            ckpt.save_config(cfg)?;
            ckpt.save_model_config(&model_cfg)?;
        }
        let metrics = cfg.metrics_csv.as_ref().map(MetricsLogger::new).transpose()?;
        if let Some(logger) = &metrics {
            tracing::info!("Logging metrics to '{}'", logger.csv_path().display());
        }

        // ── Step 5: Train ─────────────────────────────────────────────────────
        let (_, report) = train(model, &mut reader, cfg, ckpt.as_ref(), metrics.as_ref(), device)?;
        Ok(report)
    }
}
