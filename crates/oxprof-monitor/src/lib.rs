//! Background resource-telemetry monitor.
//!
//! A [`Monitor`] owns an append-only sample log and event log, arms a
//! background sampler thread that queries the telemetry probes at a fixed
//! interval, and persists the sample log as CSV. The sampler survives GPU
//! probe failures (zero-valued GPU fields plus an audit event); host probe
//! failures end the sampling session.
//!
//! Lifecycle is a two-state machine (Idle/Running) guarded by one exclusive
//! runner handle: `start` spawns the thread, `stop` joins it, and at most
//! one sampler exists per monitor at any time.

pub mod error;
pub mod event;
pub mod monitor;
pub mod store;
pub mod summary;


pub use error::{MonitorError, Result};
pub use event::EventLog;
pub use monitor::{Monitor, MonitorConfig};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if a previous holder panicked.
/// A panicking sampler iteration must not poison the logs for the
/// controller.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
