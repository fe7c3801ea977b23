use std::fmt;
use std::str::FromStr;

use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::EmbeddingError;

/// Requested compute device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevicePreference {
    /// First available GPU backend compiled in, otherwise CPU.
    #[default]
    Auto,
    Cpu,
    Cuda,
    Metal,
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda),
            "metal" => Ok(Self::Metal),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
            Self::Metal => "metal",
        };
        f.write_str(name)
    }
}

/// Resolves a [`DevicePreference`] to a candle device.
///
/// `Auto` never fails: it falls back to CPU. Explicit GPU requests fail with
/// [`EmbeddingError::DeviceUnavailable`] when the backend is missing.
pub fn select_device(preference: DevicePreference) -> Result<Device, EmbeddingError> {
    match preference {
        DevicePreference::Cpu => {
            debug!("CPU device requested");
            Ok(Device::Cpu)
        }
        DevicePreference::Cuda => Device::new_cuda(0).map_err(|e| unavailable("cuda", e)),
        DevicePreference::Metal => Device::new_metal(0).map_err(|e| unavailable("metal", e)),
        DevicePreference::Auto => Ok(select_auto()),
    }
}

fn select_auto() -> Device {
    let mut failures: Vec<String> = Vec::new();

    if cfg!(feature = "metal") {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal GPU acceleration");
                return device;
            }
            Err(e) => failures.push(format!("metal failed: {e}")),
        }
    }

    if cfg!(feature = "cuda") {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA GPU acceleration");
                return device;
            }
            Err(e) => failures.push(format!("cuda failed: {e}")),
        }
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, using CPU");
    } else {
        warn!(reason = %failures.join("; "), "Falling back to CPU device");
    }
    Device::Cpu
}

fn unavailable(device: &str, err: candle_core::Error) -> EmbeddingError {
    EmbeddingError::DeviceUnavailable {
        device: device.to_string(),
        reason: err.to_string(),
    }
}
