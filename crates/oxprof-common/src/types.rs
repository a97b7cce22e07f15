use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped snapshot of host and GPU resource usage.
///
/// Samples are immutable once appended to a sample log; append order is the
/// canonical time order. Timestamps are non-decreasing under the
/// fixed-interval sampler but not required to be strictly increasing.
///
/// Field order matches the persisted CSV column order, with `timestamp`
/// first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub timestamp: DateTime<Utc>,
    /// Host memory in use, in GB.
    pub memory_gb: f64,
    /// Global processor utilization, 0-100.
    pub cpu_percent: f64,
    /// GPU memory in use, in GB. Zero when no GPU backend is available.
    pub gpu_mem_gb: f64,
    /// GPU utilization, 0-100. Zero when no GPU backend is available.
    pub gpu_util_percent: f64,
}

/// Host-side usage as answered by a host probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostUsage {
    pub memory_gb: f64,
    pub cpu_percent: f64,
}

/// GPU-side usage as answered by a GPU probe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpuUsage {
    pub mem_gb: f64,
    pub util_percent: f64,
}

impl GpuUsage {
    /// The zero-valued usage recorded when the GPU backend fails or is
    /// absent.
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// One structured diagnostic record describing a lifecycle or I/O
/// occurrence. Immutable once appended to an event log.
///
/// `category` is a free-form label; the monitor uses `"MONITOR"`, `"IO"`,
/// `"THREAD"`, `"GPU"`, `"DATA"`, and `"SYSTEM"`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use oxprof_common::types::MonitorEvent;
///
/// let event = MonitorEvent {
///     timestamp: Utc::now(),
///     category: "IO".to_string(),
///     message: "saved 3 samples".to_string(),
///     is_error: false,
/// };
/// assert!(event.to_string().contains("[INFO] IO: saved 3 samples"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorEvent {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub message: String,
    pub is_error: bool,
}

impl std::fmt::Display for MonitorEvent {
    /// Operator-channel line: `[timestamp] [INFO|ERROR] category: message`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.is_error { "ERROR" } else { "INFO" };
        write!(
            f,
            "[{}] [{status}] {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.category,
            self.message
        )
    }
}

/// Summary statistics over a sample log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub max_memory_gb: f64,
    pub mean_memory_gb: f64,
    pub peak_cpu_percent: f64,
    pub max_gpu_mem_gb: f64,
    pub mean_gpu_util_percent: f64,
}

impl std::fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "max memory:    {:.2} GB", self.max_memory_gb)?;
        writeln!(f, "mean memory:   {:.2} GB", self.mean_memory_gb)?;
        writeln!(f, "peak cpu:      {:.1} %", self.peak_cpu_percent)?;
        writeln!(f, "max gpu mem:   {:.2} GB", self.max_gpu_mem_gb)?;
        write!(f, "mean gpu util: {:.1} %", self.mean_gpu_util_percent)
    }
}
