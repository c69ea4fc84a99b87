// ============================================================
// Layer 3 — HostArray Domain Type
// ============================================================
// A dense, row-major f64 buffer with an explicit shape.
// This is what readers hand to the training loop: plain host
// memory, no device, no framework types. Layer 5 is the only
// place that turns it into a Burn tensor.
//
// Example:
//   shape [2, 3] → values [a00, a01, a02, a10, a11, a12]

use anyhow::{ensure, Result};

/// Owned numeric array in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    shape:  Vec<usize>,
    values: Vec<f64>,
}

impl HostArray {
    /// Build an array, checking that the shape covers every value exactly.
    pub fn new(shape: impl Into<Vec<usize>>, values: Vec<f64>) -> Result<Self> {
        let shape = shape.into();
        let expected: usize = shape.iter().product();
        ensure!(
            expected == values.len(),
            "shape {:?} needs {} values, got {}",
            shape,
            expected,
            values.len()
        );
        Ok(Self { shape, values })
    }

    /// A 2-D array with every entry equal to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self { shape: vec![rows, cols], values: vec![value; rows * cols] }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Leading dimension (the batch size for samples). 0 for a scalar.
    pub fn rows(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Shape as a fixed-size array, failing if the rank is not `D`.
    pub fn dims<const D: usize>(&self) -> Result<[usize; D]> {
        self.shape
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected rank {}, got shape {:?}", D, self.shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_mismatched_shape() {
        assert!(HostArray::new([2, 3], vec![0.0; 5]).is_err());
        assert!(HostArray::new([2, 3], vec![0.0; 6]).is_ok());
    }

    #[test]
    fn test_dims_checks_rank() {
        let a = HostArray::new([2, 1, 3], vec![1.0; 6]).unwrap();
        assert_eq!(a.dims::<3>().unwrap(), [2, 1, 3]);
        assert!(a.dims::<2>().is_err());
        assert_eq!(a.rows(), 2);
    }

    #[test]
    fn test_filled() {
        let a = HostArray::filled(1, 1, 2.0);
        assert_eq!(a.shape(), &[1, 1]);
        assert_eq!(a.values(), &[2.0]);
    }
}
