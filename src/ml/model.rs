// ============================================================
// Layer 5 — QCNet Model
// ============================================================
// A per-item embedding net, a sum over items, a fitting net and
// a linear readout. Several feature arrays are concatenated on
// the descriptor axis before the embedding.
//
//   features [batch, n_items, n_desc_k] × k
//       │  cat(axis 2), embedding + tanh
//       ▼
//   [batch, n_items, e]  ── sum over items ──▶ [batch, e]
//       │  fitting + tanh, output
//       ▼
//   [batch, n_out]

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::tanh,
};

/// What the training loop needs from a model: feature tensors in,
/// one prediction tensor out, comparable to the label via MSE.
///
/// features: N tensors of shape [batch, n_items, n_desc_k]
/// returns:  [batch, n_out]
pub trait QcModel<B: Backend> {
    fn forward(&self, features: &[Tensor<B, 3>]) -> Tensor<B, 2>;
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct QcNetConfig {
    /// Descriptor width per item, summed over all feature arrays
    pub n_desc:       usize,
    /// Hidden widths of the per-item embedding net
    pub embed_layers: Vec<usize>,
    /// Hidden widths of the fitting net applied after the item sum
    pub fit_layers:   Vec<usize>,
    #[config(default = 1)]
    pub n_out:        usize,
}

impl QcNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> QcNet<B> {
        let embedding = stack_linear(self.n_desc, &self.embed_layers, device);
        let embed_out = self.embed_layers.last().copied().unwrap_or(self.n_desc);
        let fitting   = stack_linear(embed_out, &self.fit_layers, device);
        let fit_out   = self.fit_layers.last().copied().unwrap_or(embed_out);
        let output    = LinearConfig::new(fit_out, self.n_out).init(device);
        QcNet { embedding, fitting, output }
    }
}

fn stack_linear<B: Backend>(d_in: usize, widths: &[usize], device: &B::Device) -> Vec<Linear<B>> {
    widths
        .iter()
        .scan(d_in, |d, &w| {
            let layer = LinearConfig::new(*d, w).init(device);
            *d = w;
            Some(layer)
        })
        .collect()
}

/// Per-item embedding net, sum over items, fitting net, linear readout.
///
/// The item sum makes the prediction invariant to item order, so the
/// same weights apply to systems of any size.
#[derive(Module, Debug)]
pub struct QcNet<B: Backend> {
    pub embedding: Vec<Linear<B>>,
    pub fitting:   Vec<Linear<B>>,
    pub output:    Linear<B>,
}

impl<B: Backend> QcModel<B> for QcNet<B> {
    fn forward(&self, features: &[Tensor<B, 3>]) -> Tensor<B, 2> {
        // [batch, n_items, Σ n_desc]
        let mut x = Tensor::cat(features.to_vec(), 2);
        for layer in &self.embedding {
            x = tanh(layer.forward(x));
        }

        let [batch, _, hidden] = x.dims();
        let mut y = x.sum_dim(1).reshape([batch, hidden]);
        for layer in &self.fitting {
            y = tanh(layer.forward(y));
        }
        self.output.forward(y)
    }
}
