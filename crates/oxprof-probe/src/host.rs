use crate::{HostProbe, BYTES_PER_GB};
use anyhow::Result;
use oxprof_common::types::HostUsage;
use sysinfo::System;

/// Host probe backed by [`sysinfo`].
///
/// Processor usage is computed from the delta between two refreshes, so the
/// first query of a session may report 0%; the sampling interval provides
/// the spacing the library needs.
pub struct SystemProbe {
    system: System,
}

impl SystemProbe {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        Self { system }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SystemProbe {
    fn name(&self) -> &str {
        "sysinfo"
    }

    fn query(&mut self) -> Result<HostUsage> {
        self.system.refresh_memory();
        self.system.refresh_cpu_all();
        Ok(HostUsage {
            memory_gb: self.system.used_memory() as f64 / BYTES_PER_GB,
            cpu_percent: f64::from(self.system.global_cpu_usage()),
        })
    }
}
