//! Summary statistics over a sample log snapshot.

use oxprof_common::types::{ResourceSample, UsageSummary};

/// Folds a snapshot into max/mean statistics.
///
/// Returns `None` for an empty snapshot; an empty log is the documented
/// empty-input case, not a failure.
pub fn summarize(samples: &[ResourceSample]) -> Option<UsageSummary> {
    if samples.is_empty() {
        return None;
    }
    let mut summary = UsageSummary {
        max_memory_gb: 0.0,
        mean_memory_gb: 0.0,
        peak_cpu_percent: 0.0,
        max_gpu_mem_gb: 0.0,
        mean_gpu_util_percent: 0.0,
    };
    for sample in samples {
        summary.max_memory_gb = summary.max_memory_gb.max(sample.memory_gb);
        summary.peak_cpu_percent = summary.peak_cpu_percent.max(sample.cpu_percent);
        summary.max_gpu_mem_gb = summary.max_gpu_mem_gb.max(sample.gpu_mem_gb);
        summary.mean_memory_gb += sample.memory_gb;
        summary.mean_gpu_util_percent += sample.gpu_util_percent;
    }
    let count = samples.len() as f64;
    summary.mean_memory_gb /= count;
    summary.mean_gpu_util_percent /= count;
    Some(summary)
}
