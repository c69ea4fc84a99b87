// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop with Adam and a step-decay learning rate.
//
// Key Burn insights:
//   - Training runs on an AutodiffBackend for gradients
//   - model.valid() returns the model on the inner backend,
//     used for every logging-time evaluation
//   - Gradients are produced fresh by each backward() call,
//     so there is nothing to zero between steps
//
// Logged train error is the RMSE of the LAST batch of the epoch,
// not an average over the epoch.

use anyhow::Result;
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use std::time::Instant;

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::SampleBatch;
use crate::domain::traits::SampleReader;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger, ProgressTable},
};
use crate::ml::{
    evaluator::{eval_sample, mse_loss},
    model::QcModel,
    schedule::StepLr,
};

/// Everything the loop logged, plus where the schedule ended up.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub rows:     Vec<EpochMetrics>,
    pub final_lr: f64,
}

/// Adam with epsilon 1e-8 instead of Burn's 1e-5 default.
pub fn optimizer_config() -> AdamConfig {
    AdamConfig::new().with_epsilon(1e-8)
}

/// Train `model` on `reader` for `cfg.epochs` epochs.
///
/// Prints the progress table to stdout, appends to `metrics` when given,
/// and overwrites the checkpoint after every epoch when `checkpoint` is
/// given. Any error aborts the run.
pub fn train<B, M, R>(
    mut model:  M,
    reader:     &mut R,
    cfg:        &TrainConfig,
    checkpoint: Option<&CheckpointManager>,
    metrics:    Option<&MetricsLogger>,
    device:     &B::Device,
) -> Result<(M, TrainReport)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + QcModel<B>,
    M::InnerModule: QcModel<B::InnerBackend>,
    R: SampleReader,
{
    cfg.validate()?;

    let mut optim    = optimizer_config().init::<B, M>();
    let mut schedule = StepLr::new(cfg.start_lr, cfg.decay_steps, cfg.decay_rate);
    let mut rows     = Vec::new();

    let mut emit = |m: EpochMetrics| -> Result<()> {
        println!("{}", ProgressTable::row(&m));
        if let Some(logger) = metrics {
            logger.log(&m)?;
        }
        rows.push(m);
        Ok(())
    };

    println!("# working on device: {:?}", device);
    println!("{}", ProgressTable::header());

    // ── Epoch 0: evaluate before any update ───────────────────────────────────
    let tic      = Instant::now();
    let valid    = model.valid();
    let trn_loss = eval_sample::<B::InnerBackend, _>(&valid, &reader.sample_train()?, device)?;
    let tst_loss = eval_sample::<B::InnerBackend, _>(&valid, &reader.sample_all()?, device)?;
    let tst_time = tic.elapsed().as_secs_f64();
    emit(EpochMetrics::new(0, trn_loss.sqrt(), tst_loss.sqrt(), schedule.lr(), 0.0, tst_time))?;

    for epoch in 1..=cfg.epochs {
        let tic = Instant::now();
        let lr  = schedule.lr();

        // ── Training phase ────────────────────────────────────────────────────
        let mut last_loss = None;
        for sample in reader.batches() {
            let batch = SampleBatch::<B>::from_sample(&sample?, device)?;
            let loss  = mse_loss(&model, batch)?;
            last_loss = Some(loss.clone().into_scalar().elem::<f64>());

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(lr, model, grads);
        }
        let trn_loss = last_loss
            .ok_or_else(|| anyhow::anyhow!("epoch {}: the reader yielded no batches", epoch))?;

        // ── Evaluation phase ──────────────────────────────────────────────────
        if epoch % cfg.display_epoch == 0 {
            let trn_time = tic.elapsed().as_secs_f64();
            let tic      = Instant::now();
            let valid    = model.valid();
            let tst_loss = eval_sample::<B::InnerBackend, _>(&valid, &reader.sample_all()?, device)?;
            let tst_time = tic.elapsed().as_secs_f64();
            emit(EpochMetrics::new(
                epoch,
                trn_loss.sqrt(),
                tst_loss.sqrt(),
                lr,
                trn_time,
                tst_time,
            ))?;
        }

        if let Some(ckpt) = checkpoint {
            ckpt.save_model(&model, epoch)?;
        }

        schedule.step();
    }

    tracing::info!("Training complete after {} epochs", cfg.epochs);
    Ok((model, TrainReport { rows, final_lr: schedule.lr() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{array::HostArray, sample::Sample};
    use crate::ml::model::{QcNet, QcNetConfig};
    use burn::{
        backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
        module::Param,
    };

    type TestBackend = Autodiff<NdArray<f64>>;

    /// Prediction = (sum of features) * weight. Fed all-zero features it
    /// always predicts 0 and its gradient is 0, so Adam never moves it.
    #[derive(Module, Debug)]
    struct ScaledSum<B: Backend> {
        weight: Param<Tensor<B, 1>>,
    }

    impl<B: Backend> ScaledSum<B> {
        fn new(device: &B::Device) -> Self {
            Self { weight: Param::from_tensor(Tensor::ones([1], device)) }
        }
    }

    impl<B: Backend> QcModel<B> for ScaledSum<B> {
        fn forward(&self, features: &[Tensor<B, 3>]) -> Tensor<B, 2> {
            let [batch, _, _] = features[0].dims();
            let total = features[0].clone().sum_dim(2).sum_dim(1).reshape([batch, 1]);
            total * self.weight.val().reshape([1, 1])
        }
    }

    /// Yields the same sample every epoch, `per_epoch` times.
    struct RepeatReader {
        sample:    Sample,
        per_epoch: usize,
    }

    impl RepeatReader {
        fn zeros_labelled(label: f64, per_epoch: usize) -> Self {
            let label    = HostArray::filled(1, 1, label);
            let features = HostArray::new([1, 2, 3], vec![0.0; 6]).unwrap();
            Self { sample: Sample::new(label, vec![features]).unwrap(), per_epoch }
        }
    }

    impl SampleReader for RepeatReader {
        fn batches(&mut self) -> impl Iterator<Item = Result<Sample>> + '_ {
            std::iter::repeat_with(|| Ok(self.sample.clone())).take(self.per_epoch)
        }

        fn sample_train(&mut self) -> Result<Sample> {
            Ok(self.sample.clone())
        }

        fn sample_all(&mut self) -> Result<Sample> {
            Ok(self.sample.clone())
        }
    }

    /// Records the checkpoint's epoch marker at the start of every epoch.
    struct MarkerReader {
        inner: RepeatReader,
        ckpt:  CheckpointManager,
        seen:  Vec<Option<usize>>,
    }

    impl SampleReader for MarkerReader {
        fn batches(&mut self) -> impl Iterator<Item = Result<Sample>> + '_ {
            self.seen.push(self.ckpt.latest_epoch().ok());
            self.inner.batches()
        }

        fn sample_train(&mut self) -> Result<Sample> {
            self.inner.sample_train()
        }

        fn sample_all(&mut self) -> Result<Sample> {
            self.inner.sample_all()
        }
    }

    fn config(epochs: usize, display_epoch: usize) -> TrainConfig {
        TrainConfig { epochs, display_epoch, ..TrainConfig::default() }
    }

    fn run(
        reader: &mut RepeatReader,
        cfg:    &TrainConfig,
        ckpt:   Option<&CheckpointManager>,
    ) -> TrainReport {
        let device = NdArrayDevice::Cpu;
        let model  = ScaledSum::<TestBackend>::new(&device);
        let (_, report) = train(model, reader, cfg, ckpt, None, &device).unwrap();
        report
    }

    #[test]
    fn test_one_row_per_epoch_plus_epoch_zero() {
        let mut reader = RepeatReader::zeros_labelled(1.0, 2);
        let report = run(&mut reader, &config(5, 1), None);
        let epochs: Vec<usize> = report.rows.iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_display_cadence() {
        let mut reader = RepeatReader::zeros_labelled(1.0, 1);
        let report = run(&mut reader, &config(7, 3), None);
        let epochs: Vec<usize> = report.rows.iter().map(|r| r.epoch).collect();
        // floor(7 / 3) = 2 logged epochs plus epoch 0
        assert_eq!(epochs, vec![0, 3, 6]);
    }

    #[test]
    fn test_learning_rate_decays_per_epoch() {
        let mut reader = RepeatReader::zeros_labelled(1.0, 1);
        let cfg = TrainConfig {
            start_lr:    1e-2,
            decay_steps: 2,
            decay_rate:  0.5,
            ..config(4, 1)
        };
        let report = run(&mut reader, &cfg, None);
        let lrs: Vec<f64> = report.rows.iter().map(|r| r.lr).collect();
        let expected = [1e-2, 1e-2, 1e-2, 5e-3, 5e-3];
        for (got, want) in lrs.iter().zip(expected) {
            assert!((got - want).abs() < 1e-15, "{:?}", lrs);
        }
        // after 2 * decay_steps epochs: start * rate^2
        assert!((report.final_lr - 2.5e-3).abs() < 1e-15);
    }

    #[test]
    fn test_constant_prediction_keeps_error() {
        // Predicts 0 against label 2 → MSE 4, RMSE 2, every epoch.
        let mut reader = RepeatReader::zeros_labelled(2.0, 3);
        let report = run(&mut reader, &config(3, 1), None);
        for row in &report.rows {
            assert!((row.tst_err - 2.0).abs() < 1e-12);
            assert!((row.trn_err - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_errors_are_non_negative() {
        let mut reader = RepeatReader::zeros_labelled(-3.0, 2);
        let report = run(&mut reader, &config(2, 1), None);
        assert!(report.rows.iter().all(|r| r.trn_err >= 0.0 && r.tst_err >= 0.0));
        assert!(report.rows.iter().all(|r| r.trn_time >= 0.0 && r.tst_time >= 0.0));
    }

    #[test]
    fn test_checkpoint_written_every_epoch() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("qcnet"));
        let mut reader = RepeatReader::zeros_labelled(1.0, 1);

        // display cadence does not gate checkpoints
        run(&mut reader, &config(3, 5), Some(&ckpt));
        assert!(ckpt.weights_path().exists());
        assert_eq!(ckpt.latest_epoch().unwrap(), 3);
    }

    #[test]
    fn test_epoch_marker_advances_every_epoch() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().join("qcnet"));
        let device = NdArrayDevice::Cpu;
        let mut reader = MarkerReader {
            inner: RepeatReader::zeros_labelled(1.0, 1),
            ckpt:  CheckpointManager::new(dir.path().join("qcnet")),
            seen:  Vec::new(),
        };

        let model = ScaledSum::<TestBackend>::new(&device);
        train(model, &mut reader, &config(3, 2), Some(&ckpt), None, &device).unwrap();

        assert_eq!(reader.seen, vec![None, Some(1), Some(2)]);
        assert_eq!(ckpt.latest_epoch().unwrap(), 3);
    }

    #[test]
    fn test_adam_uses_small_epsilon() {
        let json    = serde_json::to_value(optimizer_config()).unwrap();
        let epsilon = json["epsilon"].as_f64().unwrap();
        assert!((epsilon - 1e-8).abs() < 1e-12, "epsilon = {}", epsilon);
    }

    #[test]
    fn test_empty_epoch_is_an_error() {
        let device = NdArrayDevice::Cpu;
        let mut reader = RepeatReader::zeros_labelled(1.0, 0);
        let model = ScaledSum::<TestBackend>::new(&device);
        assert!(train(model, &mut reader, &config(1, 1), None, None, &device).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let device = NdArrayDevice::Cpu;
        let mut reader = RepeatReader::zeros_labelled(1.0, 1);
        let model = ScaledSum::<TestBackend>::new(&device);
        assert!(train(model, &mut reader, &config(0, 1), None, None, &device).is_err());
    }

    #[test]
    fn test_qcnet_learns_a_constant() {
        let device = NdArrayDevice::Cpu;
        let label    = HostArray::filled(4, 1, 1.0);
        let features = HostArray::new([4, 3, 2], (0..24).map(|i| i as f64 * 0.05).collect()).unwrap();
        let mut reader = RepeatReader {
            sample:    Sample::new(label, vec![features]).unwrap(),
            per_epoch: 5,
        };
        let model: QcNet<TestBackend> = QcNetConfig::new(2, vec![4], vec![8]).init(&device);
        let cfg = TrainConfig { start_lr: 1e-2, ..config(20, 1) };

        let (_, report) = train(model, &mut reader, &cfg, None, None, &device).unwrap();
        let first = report.rows.first().unwrap().tst_err;
        let last  = report.rows.last().unwrap().tst_err;
        assert!(last < first, "error went from {} to {}", first, last);
    }
}
