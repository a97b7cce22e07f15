//! Telemetry probes for the oxprof monitor.
//!
//! A [`HostProbe`] answers the memory/processor share of a
//! [`ResourceSample`](oxprof_common::types::ResourceSample); a [`GpuProbe`]
//! answers the GPU share. The sampler loop queries both at each interval.
//! Host telemetry is assumed always available; GPU telemetry may be absent
//! or failing, and callers degrade it to zeroed fields.

pub mod error;
pub mod gpu;
pub mod host;

pub use error::GpuError;
#[cfg(feature = "nvml")]
pub use gpu::NvmlProbe;
pub use gpu::{detect_gpu, NoGpuProbe};
pub use host::SystemProbe;

use oxprof_common::types::{GpuUsage, HostUsage};

/// Bytes per GB, the unit used for all memory figures.
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Answers the host-side share of a resource sample.
///
/// The trait requires `Send` because the probe is owned by the sampler
/// thread while monitoring is running.
pub trait HostProbe: Send {
    /// Probe name used for logging (e.g., `"sysinfo"`).
    fn name(&self) -> &str;

    /// Queries current host memory and processor usage.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying system API call fails. Host
    /// telemetry is the core of a sample, so callers treat a failure as
    /// fatal to the sampling session.
    fn query(&mut self) -> anyhow::Result<HostUsage>;
}

/// Answers the GPU-side share of a resource sample.
pub trait GpuProbe: Send {
    /// Probe name used for logging (e.g., `"nvml"`, `"none"`).
    fn name(&self) -> &str;

    /// Queries current GPU memory and utilization.
    ///
    /// # Errors
    ///
    /// Returns a [`GpuError`] when the backend is absent or the device
    /// query fails. Callers recover by recording zero-valued GPU fields;
    /// the error never aborts sampling.
    fn query(&mut self) -> Result<GpuUsage, GpuError>;
}
