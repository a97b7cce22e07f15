/// Errors from a GPU probe query.
///
/// These are always recovered inside the sampler loop (zero-valued GPU
/// fields plus an audit event) and never surface to the monitor's caller.
///
/// # Examples
///
/// ```
/// use oxprof_probe::error::GpuError;
///
/// let err = GpuError::Unavailable;
/// assert!(err.to_string().contains("no GPU backend"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// The NVML library reported an error (driver missing, device absent,
    /// query unsupported).
    #[cfg(feature = "nvml")]
    #[error("NVML error: {0}")]
    Nvml(#[from] nvml_wrapper::error::NvmlError),

    /// No GPU backend is available on this host.
    #[error("no GPU backend available")]
    Unavailable,
}
