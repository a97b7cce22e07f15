use oxprof_monitor::MonitorConfig;
use serde::Deserialize;

/// Recorder configuration (TOML).
///
/// ```toml
/// interval_ms = 5000
/// log_path = "logs/resource_log.csv"
/// verbose = true
/// append = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RecorderConfig {
    #[serde(flatten)]
    pub monitor: MonitorConfig,
    /// Append to a previously recorded log instead of starting fresh.
    #[serde(default)]
    pub append: bool,
}

impl RecorderConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
