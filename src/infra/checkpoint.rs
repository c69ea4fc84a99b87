// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's NamedMpkGzFileRecorder
// (named MessagePack, gzip, full precision).
//
// A checkpoint is addressed by one path. Given `runs/qcnet`:
//
//   runs/qcnet.mpk.gz       ← weights, overwritten every epoch
//   runs/qcnet.epoch.json   ← last epoch written (update marker)
//   runs/qcnet.config.json  ← TrainConfig of the run
//   runs/qcnet.model.json   ← QcNetConfig, to rebuild the model
//
// Any extension on the given path is replaced, the same way the
// recorder itself treats it.

use anyhow::{Context, Result};
use burn::{
    config::Config,
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::QcNetConfig;

const WEIGHTS_EXT: &str = "mpk.gz";
const EPOCH_EXT:   &str = "epoch.json";
const CONFIG_EXT:  &str = "config.json";
const MODEL_EXT:   &str = "model.json";

type WeightsRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Manages the files of one checkpoint.
pub struct CheckpointManager {
    /// Checkpoint path without extension
    stem: PathBuf,
}

impl CheckpointManager {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { stem: path.as_ref().to_path_buf() }
    }

    /// The file the weights end up in.
    pub fn weights_path(&self) -> PathBuf {
        self.stem.with_extension(WEIGHTS_EXT)
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.stem.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create checkpoint dir '{}'", parent.display()))?;
        }
        Ok(())
    }

    /// Overwrite the weights with the current model state and
    /// record which epoch they belong to.
    pub fn save_model<B: Backend, M: Module<B>>(&self, model: &M, epoch: usize) -> Result<()> {
        self.ensure_dir()?;

        let recorder = WeightsRecorder::new();
        Recorder::<B>::record(&recorder, model.clone().into_record(), self.stem.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", self.weights_path().display())
            })?;

        let marker = self.stem.with_extension(EPOCH_EXT);
        fs::write(&marker, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", marker.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Restore saved weights into a freshly initialised model.
    /// The architecture must match the one that was saved.
    pub fn load_model<B: Backend, M: Module<B>>(&self, model: M, device: &B::Device) -> Result<M> {
        let recorder = WeightsRecorder::new();
        let record = Recorder::<B>::load(&recorder, self.stem.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    self.weights_path().display()
                )
            })?;

        tracing::info!("Loaded weights from epoch {}", self.latest_epoch()?);
        Ok(model.load_record(record))
    }

    /// Last epoch written by `save_model`.
    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.stem.with_extension(EPOCH_EXT);
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.stem.with_extension(CONFIG_EXT);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.stem.with_extension(CONFIG_EXT);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' with this checkpoint.",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_model_config(&self, cfg: &QcNetConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.stem.with_extension(MODEL_EXT);
        cfg.save(&path)
            .with_context(|| format!("Cannot write model config to '{}'", path.display()))
    }

    pub fn load_model_config(&self) -> Result<QcNetConfig> {
        let path = self.stem.with_extension(MODEL_EXT);
        QcNetConfig::load(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read model config '{}': {:?}", path.display(), e))
    }
}
