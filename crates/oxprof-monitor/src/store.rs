//! CSV persistence for the sample log.
//!
//! One row per sample under a fixed header row; the first column is an
//! RFC 3339 timestamp. `save` followed by `load` round-trips the log.

use crate::error::Result;
use oxprof_common::types::ResourceSample;
use std::fs;
use std::path::Path;

/// Persisted column order. Matches the `ResourceSample` field names so the
/// header also drives deserialization.
const HEADER: [&str; 5] = [
    "timestamp",
    "memory_gb",
    "cpu_percent",
    "gpu_mem_gb",
    "gpu_util_percent",
];

/// Writes `samples` to `path`, creating the parent directory if needed.
/// The header row is written even for an empty log. Returns the row count.
pub fn save(path: &Path, samples: &[ResourceSample]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(HEADER)?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(samples.len())
}

/// Reads samples back from `path`. Any malformed row fails the whole load.
pub fn load(path: &Path) -> Result<Vec<ResourceSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let mut samples = Vec::new();
    for row in reader.deserialize() {
        samples.push(row?);
    }
    Ok(samples)
}
