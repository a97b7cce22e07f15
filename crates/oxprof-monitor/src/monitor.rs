//! Lifecycle façade over the background sampler thread.

use crate::error::{MonitorError, Result};
use crate::event::EventLog;
use crate::{lock_unpoisoned, store, summary};
use chrono::Utc;
use oxprof_common::types::{GpuUsage, MonitorEvent, ResourceSample, UsageSummary};
use oxprof_probe::{GpuProbe, HostProbe, SystemProbe};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Monitor configuration. The CLI loads it from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Milliseconds between two samples.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Optional CSV path used by `save`/`load` when no explicit path is
    /// given, and auto-loaded at construction when the file exists.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
    /// Echo every event on stdout as it is appended.
    #[serde(default)]
    pub verbose: bool,
}

fn default_interval_ms() -> u64 {
    5000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            log_path: None,
            verbose: false,
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// The telemetry probes. Owned by the monitor while Idle and by the sampler
/// thread while Running; handed back through the join value at `stop`.
struct Probes {
    host: Box<dyn HostProbe>,
    gpu: Box<dyn GpuProbe>,
}

/// What the sampler thread hands back when it exits.
struct SessionEnd {
    probes: Probes,
    fatal: Option<MonitorError>,
}

/// Exclusive handle to the running sampler thread. Present iff Running.
struct SamplerHandle {
    stop_tx: Sender<()>,
    thread: JoinHandle<SessionEnd>,
}

/// Coordinates the background sampler and owns the sample and event logs.
///
/// Created Idle. [`start`](Monitor::start) transitions Idle→Running and
/// spawns the sampler thread; [`stop`](Monitor::stop) transitions
/// Running→Idle and joins it. Both logs persist across start/stop cycles
/// unless a non-appending `start` clears the sample log. At most one
/// sampler thread exists per monitor at any time.
pub struct Monitor {
    config: MonitorConfig,
    samples: Arc<Mutex<Vec<ResourceSample>>>,
    events: Arc<EventLog>,
    probes: Option<Probes>,
    runner: Option<SamplerHandle>,
}

impl Monitor {
    /// Creates an idle monitor with the default host probe and the best
    /// available GPU probe.
    ///
    /// If a log path is configured and the file exists, the persisted
    /// sample log is loaded silently.
    ///
    /// # Errors
    ///
    /// Fails when a configured persisted log exists but does not parse.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        Self::with_probes(config, Box::new(SystemProbe::new()), oxprof_probe::detect_gpu())
    }

    /// Creates an idle monitor using the given probes. Used by tests and by
    /// callers with alternative telemetry backends.
    pub fn with_probes(
        config: MonitorConfig,
        host: Box<dyn HostProbe>,
        gpu: Box<dyn GpuProbe>,
    ) -> Result<Self> {
        let events = Arc::new(EventLog::new(config.verbose));
        events.record("SYSTEM", "monitor initialized", false);
        let mut monitor = Self {
            config,
            samples: Arc::new(Mutex::new(Vec::new())),
            events,
            probes: Some(Probes { host, gpu }),
            runner: None,
        };
        if let Some(path) = monitor.config.log_path.clone() {
            if path.exists() {
                monitor.load(Some(&path), true)?;
            }
        }
        Ok(monitor)
    }

    /// Arms the sampler and spawns the background thread.
    ///
    /// With `append` false the sample log is cleared first; the event log
    /// is never cleared by `start`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlreadyRunning`] when called while Running;
    /// concurrent sessions are rejected rather than spawning a second loop.
    pub fn start(&mut self, append: bool) -> Result<()> {
        if self.runner.is_some() {
            self.events
                .record("MONITOR", "monitoring already in progress", true);
            return Err(MonitorError::AlreadyRunning);
        }
        let session = if append {
            "appending to existing log"
        } else {
            "starting new log"
        };
        self.events.record("MONITOR", format!("{session} session"), false);
        if !append {
            self.lock_samples().clear();
            self.events.record("DATA", "existing samples cleared", false);
        }

        let probes = match self.probes.take() {
            Some(probes) => probes,
            None => {
                let message = "telemetry probes lost to an earlier sampler panic";
                self.events.record("THREAD", message, true);
                return Err(MonitorError::ProviderFailure(message.to_string()));
            }
        };
        let samples = Arc::clone(&self.samples);
        let events = Arc::clone(&self.events);
        let interval = self.config.interval();
        let (stop_tx, stop_rx) = mpsc::channel();
        let thread = match thread::Builder::new()
            .name("oxprof-sampler".to_string())
            .spawn(move || sample_loop(probes, samples, events, interval, stop_rx))
        {
            Ok(thread) => thread,
            Err(err) => {
                self.events
                    .record("THREAD", format!("failed to spawn sampler thread: {err}"), true);
                return Err(err.into());
            }
        };
        self.runner = Some(SamplerHandle { stop_tx, thread });
        self.events.record("THREAD", "sampler thread started", false);
        Ok(())
    }

    /// Disarms the sampler and blocks until the thread has exited.
    ///
    /// After this returns, no further sample can be appended and the sample
    /// log is safe to read or export without synchronization.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotRunning`] when called while Idle, and
    /// surfaces a fatal host-probe failure from the finished session as
    /// [`MonitorError::ProviderFailure`].
    pub fn stop(&mut self) -> Result<()> {
        let Some(runner) = self.runner.take() else {
            self.events
                .record("MONITOR", "stop requested but not running", true);
            return Err(MonitorError::NotRunning);
        };
        // Dropping the sender disconnects the stop channel, which wakes the
        // loop's interval wait immediately.
        drop(runner.stop_tx);
        match runner.thread.join() {
            Ok(end) => {
                self.probes = Some(end.probes);
                self.events.record("THREAD", "sampler thread stopped", false);
                self.events.record("MONITOR", "monitoring stopped", false);
                match end.fatal {
                    Some(err) => Err(err),
                    None => Ok(()),
                }
            }
            Err(_) => {
                self.events.record("THREAD", "sampler thread panicked", true);
                Err(MonitorError::ProviderFailure(
                    "sampler thread panicked".to_string(),
                ))
            }
        }
    }

    /// Writes a snapshot of the sample log as CSV to `path`, or to the
    /// configured log path when `path` is `None`. Returns the row count.
    ///
    /// Overwriting an existing file is permitted and recorded, not blocked.
    /// May run while sampling is still appending; the snapshot is taken
    /// under the lock before writing.
    pub fn save(&self, path: Option<&Path>) -> Result<usize> {
        let path = self.resolve_path(path, "save")?;
        if path.exists() {
            self.events.record(
                "IO",
                format!("file already exists: {}; overwriting", path.display()),
                false,
            );
        }
        let snapshot = self.lock_samples().clone();
        match store::save(&path, &snapshot) {
            Ok(count) => {
                self.events.record(
                    "IO",
                    format!("saved {count} samples to {}", path.display()),
                    false,
                );
                Ok(count)
            }
            Err(err) => {
                self.events.record("IO", format!("save failed: {err}"), true);
                Err(err)
            }
        }
    }

    /// Replaces the sample log with rows parsed from `path`, or from the
    /// configured log path when `path` is `None`. Returns the row count.
    ///
    /// A missing file is reported as an event and, unless `silent`, echoed
    /// on the operator channel; whether the caller treats it as fatal is
    /// its choice.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidState`] while Running (the sample log
    /// is replaceable wholesale only while Idle),
    /// [`MonitorError::FileNotFound`] for a missing file, and
    /// [`MonitorError::Malformed`] when a row does not parse.
    pub fn load(&mut self, path: Option<&Path>, silent: bool) -> Result<usize> {
        if self.runner.is_some() {
            self.events
                .record("IO", "load rejected: sampling is running", true);
            return Err(MonitorError::InvalidState { operation: "load" });
        }
        let path = self.resolve_path(path, "load")?;
        if !path.exists() {
            let message = format!("file not found: {}", path.display());
            self.events.record("IO", &message, true);
            if !silent {
                println!("{message}");
            }
            return Err(MonitorError::FileNotFound { path });
        }
        match store::load(&path) {
            Ok(rows) => {
                let count = rows.len();
                *self.lock_samples() = rows;
                let message = format!("loaded {count} samples from {}", path.display());
                self.events.record("IO", &message, false);
                if !silent {
                    println!("{message}");
                }
                Ok(count)
            }
            Err(err) => {
                self.events.record("IO", format!("load failed: {err}"), true);
                Err(err)
            }
        }
    }

    /// Summary statistics over the current sample log, or `None` when the
    /// log is empty.
    pub fn summarize(&self) -> Option<UsageSummary> {
        summary::summarize(&self.lock_samples())
    }

    /// Snapshot copy of the sample log.
    pub fn samples(&self) -> Vec<ResourceSample> {
        self.lock_samples().clone()
    }

    pub fn sample_count(&self) -> usize {
        self.lock_samples().len()
    }

    /// Snapshot copy of the event log, optionally restricted to one
    /// category. Never a live-mutable reference.
    pub fn event_log(&self, filter_category: Option<&str>) -> Vec<MonitorEvent> {
        self.events.snapshot(filter_category)
    }

    /// The most recent event, if any.
    pub fn last_event(&self) -> Option<MonitorEvent> {
        self.events.last()
    }

    /// Prints up to `max_events` of the most recent events on the operator
    /// channel.
    pub fn print_event_log(&self, max_events: usize) {
        self.events.print_tail(max_events);
    }

    pub fn is_running(&self) -> bool {
        self.runner.is_some()
    }

    fn resolve_path(&self, path: Option<&Path>, operation: &'static str) -> Result<PathBuf> {
        match path
            .map(Path::to_path_buf)
            .or_else(|| self.config.log_path.clone())
        {
            Some(path) => Ok(path),
            None => {
                self.events.record(
                    "IO",
                    format!("{operation} failed: no log path configured"),
                    true,
                );
                Err(MonitorError::NoPathConfigured)
            }
        }
    }

    fn lock_samples(&self) -> MutexGuard<'_, Vec<ResourceSample>> {
        lock_unpoisoned(&self.samples)
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        // A still-armed sampler must not outlive its logs.
        if let Some(runner) = self.runner.take() {
            drop(runner.stop_tx);
            let _ = runner.thread.join();
        }
    }
}

/// Body of the sampler thread: one sample per interval until the stop
/// channel disconnects or the host probe fails.
fn sample_loop(
    mut probes: Probes,
    samples: Arc<Mutex<Vec<ResourceSample>>>,
    events: Arc<EventLog>,
    interval: Duration,
    stop_rx: Receiver<()>,
) -> SessionEnd {
    let fatal = loop {
        let host = match probes.host.query() {
            Ok(usage) => usage,
            Err(err) => {
                let message = format!("host probe '{}' failed: {err}", probes.host.name());
                events.record("MONITOR", &message, true);
                break Some(MonitorError::ProviderFailure(message));
            }
        };
        let gpu = match probes.gpu.query() {
            Ok(usage) => usage,
            Err(err) => {
                events.record("GPU", format!("{err}; recording zeroed GPU fields"), true);
                GpuUsage::zeroed()
            }
        };
        lock_unpoisoned(&samples).push(ResourceSample {
            timestamp: Utc::now(),
            memory_gb: host.memory_gb,
            cpu_percent: host.cpu_percent,
            gpu_mem_gb: gpu.mem_gb,
            gpu_util_percent: gpu.util_percent,
        });
        // The stop signal doubles as the interval clock: a disconnect wakes
        // the wait at once, so no extra sample is taken after stop.
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break None,
        }
    };
    SessionEnd { probes, fatal }
}
