// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// The device is a configuration value chosen once by the caller
// and threaded through the use cases, never a global.
//
//   cpu → NdArray<f64>  (double precision, always available)
//   gpu → Wgpu          (f32, needs a graphics adapter)
//
// Training uses the Autodiff wrapper; evaluation of a restored
// checkpoint uses the plain backend.

use burn::backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CpuBackend      = NdArray<f64>;
pub type GpuBackend      = Wgpu;
pub type CpuTrainBackend = Autodiff<CpuBackend>;
pub type GpuTrainBackend = Autodiff<GpuBackend>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Cpu,
    Gpu,
}

impl DeviceKind {
    pub fn cpu_device() -> NdArrayDevice {
        NdArrayDevice::Cpu
    }

    pub fn gpu_device() -> WgpuDevice {
        WgpuDevice::default()
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Cpu => write!(f, "cpu"),
            DeviceKind::Gpu => write!(f, "gpu"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serialized_name() {
        for kind in [DeviceKind::Cpu, DeviceKind::Gpu] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
        assert_eq!(DeviceKind::default().to_string(), "cpu");
    }
}
