use crate::error::{PredictionError, Result};
use candle_core::{DType, Device};

/// Where model weights are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceRequest {
    /// Run on the CPU (default).
    #[default]
    Cpu,
    /// Run on the CUDA GPU with this ordinal.
    Cuda(usize),
}

impl DeviceRequest {
    pub(crate) fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => {
                tracing::warn!("Using CPU, is cuda available?");
                Ok(Device::Cpu)
            }
            DeviceRequest::Cuda(i) => {
                let device = Device::new_cuda(i).map_err(|e| {
                    PredictionError::Device(format!(
                        "Failed to init CUDA device {i}: {e}. Try CPU as fallback."
                    ))
                })?;
                tracing::info!(ordinal = i, "Using GPU (cuda)");
                Ok(device)
            }
        }
    }
}

/// Half precision on accelerators, full precision on the CPU.
pub(crate) fn weight_dtype(device: &Device) -> DType {
    if device.is_cuda() {
        DType::F16
    } else {
        DType::F32
    }
}

macro_rules! impl_device_methods {
    ($builder:ident) => {
        impl $builder {
            /// Use CPU for inference (default).
            pub fn cpu(mut self) -> Self {
                self.device_request = crate::pipelines::utils::DeviceRequest::Cpu;
                self
            }

            /// Use a specific CUDA GPU for inference.
            pub fn cuda(mut self, index: usize) -> Self {
                self.device_request = crate::pipelines::utils::DeviceRequest::Cuda(index);
                self
            }
        }
    };
}

pub(crate) use impl_device_methods;
