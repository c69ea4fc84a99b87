// ============================================================
// Layer 2 — EvalUseCase
// ============================================================
// Restores a checkpoint and reports its errors:
//   1. Read the TrainConfig and QcNetConfig saved next to it
//   2. Rebuild the reader with the recorded seed (same split)
//   3. Rebuild the model and load the weights
//   4. RMSE on one training batch and on the held-out set
//
// No autodiff here, evaluation runs on the plain backend.

use anyhow::Result;
use burn::prelude::*;

use crate::data::reader::GroupReader;
use crate::domain::traits::SampleReader;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    backend::{CpuBackend, DeviceKind, GpuBackend},
    evaluator::eval_sample,
    model::QcNet,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub epoch:   usize,
    pub trn_err: f64,
    pub tst_err: f64,
}

pub struct EvalUseCase {
    checkpoint: String,
    /// Overrides the data dirs recorded at training time
    data_dirs:  Option<Vec<String>>,
    device:     DeviceKind,
}

impl EvalUseCase {
    pub fn new(checkpoint: String, data_dirs: Option<Vec<String>>, device: DeviceKind) -> Self {
        Self { checkpoint, data_dirs, device }
    }

    pub fn execute(&self) -> Result<EvalReport> {
        match self.device {
            DeviceKind::Cpu => self.run::<CpuBackend>(&DeviceKind::cpu_device()),
            DeviceKind::Gpu => self.run::<GpuBackend>(&DeviceKind::gpu_device()),
        }
    }

    fn run<B: Backend>(&self, device: &B::Device) -> Result<EvalReport> {
        let ckpt = CheckpointManager::new(&self.checkpoint);
        tracing::info!("Evaluating '{}' on {}", self.checkpoint, self.device);
        let cfg  = ckpt.load_config()?;

        let dirs = self.data_dirs.clone().unwrap_or_else(|| cfg.data_dirs.clone());
        let mut reader = GroupReader::new(&dirs, cfg.batch_size, cfg.test_ratio, cfg.seed)?;

        let model_cfg = ckpt.load_model_config()?;
        let model: QcNet<B> = ckpt.load_model::<B, _>(model_cfg.init(device), device)?;

        let trn_loss = eval_sample(&model, &reader.sample_train()?, device)?;
        let tst_loss = eval_sample(&model, &reader.sample_all()?, device)?;

        Ok(EvalReport {
            epoch:   ckpt.latest_epoch()?,
            trn_err: trn_loss.sqrt(),
            tst_err: tst_loss.sqrt(),
        })
    }
}
