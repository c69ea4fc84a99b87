// ============================================================
// Layer 3 — Sample Domain Type
// ============================================================
// One unit of training data: a label plus N feature arrays.
//
//   label:    [batch, n_out]
//   features: [batch, n_items, n_desc_k]   for k in 0..N
//
// Every array shares the leading batch dimension. The training
// loop treats the contents as opaque numbers; only the model
// cares what the features mean.

use anyhow::{ensure, Result};

use crate::domain::array::HostArray;

#[derive(Debug, Clone)]
pub struct Sample {
    pub label:    HostArray,
    pub features: Vec<HostArray>,
}

impl Sample {
    /// Build a sample after checking ranks and the shared batch dimension.
    pub fn new(label: HostArray, features: Vec<HostArray>) -> Result<Self> {
        label.dims::<2>()?;
        ensure!(!features.is_empty(), "a sample needs at least one feature array");
        for (k, f) in features.iter().enumerate() {
            f.dims::<3>()?;
            ensure!(
                f.rows() == label.rows(),
                "feature {} has {} rows but the label has {}",
                k,
                f.rows(),
                label.rows()
            );
        }
        Ok(Self { label, features })
    }

    /// Number of frames stacked in this sample.
    pub fn batch_len(&self) -> usize {
        self.label.rows()
    }
}
