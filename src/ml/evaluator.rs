// ============================================================
// Layer 5 — Evaluator
// ============================================================
// MSE of a model on one sample. Shared by the training step
// (on the autodiff backend, loss kept as a tensor) and by the
// logging-time evaluation (on the inner backend, loss as f64).

use anyhow::{ensure, Result};
use burn::{
    nn::loss::{MseLoss, Reduction},
    prelude::*,
    tensor::ElementConversion,
};

use crate::data::batcher::SampleBatch;
use crate::domain::sample::Sample;
use crate::ml::model::QcModel;

/// Forward pass plus mean-squared error against the batch label.
pub fn mse_loss<B: Backend, M: QcModel<B>>(model: &M, batch: SampleBatch<B>) -> Result<Tensor<B, 1>> {
    let pred = model.forward(&batch.features);
    ensure!(
        pred.dims() == batch.label.dims(),
        "prediction shape {:?} does not match label shape {:?}",
        pred.dims(),
        batch.label.dims()
    );
    Ok(MseLoss::new().forward(pred, batch.label, Reduction::Mean))
}

/// MSE of `model` on a host sample, as a plain number.
pub fn eval_sample<B: Backend, M: QcModel<B>>(
    model:  &M,
    sample: &Sample,
    device: &B::Device,
) -> Result<f64> {
    let batch = SampleBatch::<B>::from_sample(sample, device)?;
    let loss  = mse_loss(model, batch)?;
    Ok(loss.into_scalar().elem::<f64>())
}
