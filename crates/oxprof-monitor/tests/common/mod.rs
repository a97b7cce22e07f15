#![allow(dead_code)]

use oxprof_common::types::{GpuUsage, HostUsage};
use oxprof_monitor::{Monitor, MonitorConfig};
use oxprof_probe::{GpuError, GpuProbe, HostProbe};

pub const HOST_MEMORY_GB: f64 = 10.25;
pub const HOST_CPU_PERCENT: f64 = 40.0;
pub const GPU_MEM_GB: f64 = 2.5;
pub const GPU_UTIL_PERCENT: f64 = 60.0;

/// Host probe answering the same figures on every query.
pub struct StaticHost;

impl HostProbe for StaticHost {
    fn name(&self) -> &str {
        "static"
    }

    fn query(&mut self) -> anyhow::Result<HostUsage> {
        Ok(HostUsage {
            memory_gb: HOST_MEMORY_GB,
            cpu_percent: HOST_CPU_PERCENT,
        })
    }
}

/// Host probe that fails every query, ending the sampling session.
pub struct FailingHost;

impl HostProbe for FailingHost {
    fn name(&self) -> &str {
        "offline"
    }

    fn query(&mut self) -> anyhow::Result<HostUsage> {
        anyhow::bail!("host telemetry offline")
    }
}

/// GPU probe answering the same figures on every query.
pub struct StaticGpu;

impl GpuProbe for StaticGpu {
    fn name(&self) -> &str {
        "static"
    }

    fn query(&mut self) -> Result<GpuUsage, GpuError> {
        Ok(GpuUsage {
            mem_gb: GPU_MEM_GB,
            util_percent: GPU_UTIL_PERCENT,
        })
    }
}

/// GPU probe that raises on every query.
pub struct FailingGpu;

impl GpuProbe for FailingGpu {
    fn name(&self) -> &str {
        "failing"
    }

    fn query(&mut self) -> Result<GpuUsage, GpuError> {
        Err(GpuError::Unavailable)
    }
}

pub fn config(interval_ms: u64) -> MonitorConfig {
    MonitorConfig {
        interval_ms,
        log_path: None,
        verbose: false,
    }
}

/// Monitor wired to the static probes.
pub fn static_monitor(interval_ms: u64) -> Monitor {
    Monitor::with_probes(config(interval_ms), Box::new(StaticHost), Box::new(StaticGpu))
        .expect("construction with no log path cannot fail")
}
