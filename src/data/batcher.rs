// ============================================================
// Layer 4 — Sample Batcher
// ============================================================
// Moves a host-side Sample onto the training device.
//
//   label:    HostArray [n, n_out]          → Tensor<B, 2>
//   features: HostArray [n, n_items, w_k]   → Tensor<B, 3>
//
// Values are converted to the backend's float element type here
// (f64 on NdArray, f32 on Wgpu), so readers never need to know
// which backend the run uses.

use anyhow::Result;
use burn::{prelude::*, tensor::TensorData};

use crate::domain::{array::HostArray, sample::Sample};

/// A sample ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct SampleBatch<B: Backend> {
    /// Targets — shape: [batch_size, n_out]
    pub label: Tensor<B, 2>,

    /// One tensor per feature array — shape: [batch_size, n_items, w_k]
    pub features: Vec<Tensor<B, 3>>,
}

impl<B: Backend> SampleBatch<B> {
    pub fn from_sample(sample: &Sample, device: &B::Device) -> Result<Self> {
        let label = to_tensor::<B, 2>(&sample.label, device)?;
        let features = sample
            .features
            .iter()
            .map(|f| to_tensor::<B, 3>(f, device))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { label, features })
    }
}

fn to_tensor<B: Backend, const D: usize>(
    array:  &HostArray,
    device: &B::Device,
) -> Result<Tensor<B, D>> {
    let shape = array.dims::<D>()?;
    let data  = TensorData::new(array.values().to_vec(), shape).convert::<B::FloatElem>();
    Ok(Tensor::from_data(data, device))
}
