use std::path::PathBuf;

/// Errors from the monitor's lifecycle and persistence operations.
///
/// Every error surfaced to a caller is also recorded as an error-flagged
/// event in the monitor's event log before it propagates, so each failure
/// has a durable audit trace. GPU probe failures are not represented here:
/// they are recovered inside the sampler loop and never surface.
///
/// # Examples
///
/// ```
/// use oxprof_monitor::error::MonitorError;
///
/// let err = MonitorError::InvalidState { operation: "load" };
/// assert!(err.to_string().contains("load"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// `start` was called while the sampler is already running.
    #[error("Monitor: sampling already in progress")]
    AlreadyRunning,

    /// `stop` was called while the monitor is idle.
    #[error("Monitor: sampling not running")]
    NotRunning,

    /// The operation is not valid in the current lifecycle phase.
    #[error("Monitor: {operation} is not valid while sampling is running")]
    InvalidState { operation: &'static str },

    /// The persisted sample file does not exist.
    #[error("Monitor: file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// An underlying filesystem error while saving or loading the sample
    /// log.
    #[error("Monitor: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted sample file contained rows that do not parse. Corrupted
    /// persisted state is never silently adopted.
    #[error("Monitor: malformed sample file: {0}")]
    Malformed(String),

    /// The host telemetry probe failed; the sampling session is over.
    #[error("Monitor: {0}")]
    ProviderFailure(String),

    /// `save`/`load` was called with no explicit path and no configured
    /// one.
    #[error("Monitor: no log path configured and none was given")]
    NoPathConfigured,
}

impl From<csv::Error> for MonitorError {
    /// CSV errors carry either a transport failure or a parse failure;
    /// split them back into the taxonomy.
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => MonitorError::Io(io),
            _ => MonitorError::Malformed(message),
        }
    }
}

/// Convenience `Result` alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
