use std::fmt;
use std::str::FromStr;

use crate::error::AlignmentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    Cuda,
    Metal,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
            Self::Metal => "metal",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = AlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda),
            "metal" | "mps" => Ok(Self::Metal),
            other => Err(AlignmentError::invalid_input(format!(
                "unknown device {other:?}; expected cpu, cuda or metal"
            ))),
        }
    }
}

/// Backend capability query. Implementations hold no mutable state.
pub trait DeviceProbe: Send + Sync {
    /// CUDA is compiled in and a device is present.
    fn cuda_available(&self) -> bool;
    fn metal_available(&self) -> bool;
}

/// Asks candle which accelerators this build can reach.
pub struct CandleDeviceProbe;

impl DeviceProbe for CandleDeviceProbe {
    fn cuda_available(&self) -> bool {
        candle_core::utils::cuda_is_available()
    }

    fn metal_available(&self) -> bool {
        candle_core::utils::metal_is_available()
    }
}

/// CUDA when available, otherwise CPU. Metal is reported by the probe but not
/// preferred.
pub fn best_device(probe: &dyn DeviceProbe) -> DeviceKind {
    let device = if probe.cuda_available() {
        DeviceKind::Cuda
    } else {
        DeviceKind::Cpu
    };
    tracing::debug!(
        %device,
        metal_available = probe.metal_available(),
        "selected alignment device"
    );
    device
}
