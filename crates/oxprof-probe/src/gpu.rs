use crate::error::GpuError;
use crate::GpuProbe;
#[cfg(feature = "nvml")]
use crate::BYTES_PER_GB;
use oxprof_common::types::GpuUsage;

#[cfg(feature = "nvml")]
use nvml_wrapper::Nvml;

/// Stand-in probe for hosts without a usable GPU backend.
///
/// Every query fails with [`GpuError::Unavailable`], which the sampler
/// degrades to zero-valued GPU fields.
pub struct NoGpuProbe;

impl GpuProbe for NoGpuProbe {
    fn name(&self) -> &str {
        "none"
    }

    fn query(&mut self) -> Result<GpuUsage, GpuError> {
        Err(GpuError::Unavailable)
    }
}

/// GPU probe backed by NVML.
///
/// The NVML handle is acquired once and lives as long as the probe;
/// per-query work is only the device lookup and the two usage calls.
#[cfg(feature = "nvml")]
pub struct NvmlProbe {
    nvml: Nvml,
    device_index: u32,
}

#[cfg(feature = "nvml")]
impl NvmlProbe {
    /// Initializes NVML and targets the given device index.
    ///
    /// # Errors
    ///
    /// Returns [`GpuError::Nvml`] when the NVML library cannot be loaded
    /// (no driver installed, no NVIDIA device).
    pub fn new(device_index: u32) -> Result<Self, GpuError> {
        Ok(Self {
            nvml: Nvml::init()?,
            device_index,
        })
    }
}

#[cfg(feature = "nvml")]
impl GpuProbe for NvmlProbe {
    fn name(&self) -> &str {
        "nvml"
    }

    fn query(&mut self) -> Result<GpuUsage, GpuError> {
        let device = self.nvml.device_by_index(self.device_index)?;
        let memory = device.memory_info()?;
        let utilization = device.utilization_rates()?;
        Ok(GpuUsage {
            mem_gb: memory.used as f64 / BYTES_PER_GB,
            util_percent: f64::from(utilization.gpu),
        })
    }
}

/// Picks the best available GPU probe: NVML device 0 when the library
/// initializes, otherwise [`NoGpuProbe`].
///
/// Detection happens once per monitor, not per query.
pub fn detect_gpu() -> Box<dyn GpuProbe> {
    #[cfg(feature = "nvml")]
    match NvmlProbe::new(0) {
        Ok(probe) => return Box::new(probe),
        Err(e) => {
            tracing::debug!(error = %e, "NVML unavailable, GPU fields will be zeroed");
        }
    }
    Box::new(NoGpuProbe)
}
