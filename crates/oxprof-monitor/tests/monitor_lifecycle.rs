mod common;

use common::{
    static_monitor, FailingGpu, FailingHost, StaticGpu, StaticHost, GPU_MEM_GB, GPU_UTIL_PERCENT,
    HOST_CPU_PERCENT, HOST_MEMORY_GB,
};
use oxprof_monitor::{Monitor, MonitorError};
use std::thread;
use std::time::Duration;

#[test]
fn two_sessions_append_in_order() {
    let mut monitor = static_monitor(20);

    monitor.start(false).unwrap();
    thread::sleep(Duration::from_millis(70));
    monitor.stop().unwrap();
    let first_session = monitor.sample_count();
    assert!(first_session >= 1);

    monitor.start(true).unwrap();
    thread::sleep(Duration::from_millis(70));
    monitor.stop().unwrap();

    let samples = monitor.samples();
    assert!(samples.len() > first_session);
    assert!(samples
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));
}

#[test]
fn non_appending_start_clears_previous_samples() {
    let mut monitor = static_monitor(20);

    monitor.start(false).unwrap();
    thread::sleep(Duration::from_millis(70));
    monitor.stop().unwrap();
    assert!(monitor.sample_count() >= 1);

    monitor.start(false).unwrap();
    monitor.stop().unwrap();
    // Only the new session's samples remain (possibly just the first one).
    assert!(monitor.sample_count() <= 1);
}

#[test]
fn lifecycle_misuse_is_rejected() {
    let mut monitor = static_monitor(20);
    assert!(matches!(monitor.stop(), Err(MonitorError::NotRunning)));

    monitor.start(false).unwrap();
    assert!(monitor.is_running());
    assert!(matches!(
        monitor.start(true),
        Err(MonitorError::AlreadyRunning)
    ));

    monitor.stop().unwrap();
    assert!(!monitor.is_running());
    assert!(matches!(monitor.stop(), Err(MonitorError::NotRunning)));
}

#[test]
fn failing_gpu_degrades_to_zeroed_fields() {
    let mut monitor =
        Monitor::with_probes(common::config(20), Box::new(StaticHost), Box::new(FailingGpu))
            .unwrap();

    monitor.start(false).unwrap();
    thread::sleep(Duration::from_millis(70));
    monitor.stop().unwrap();

    let samples = monitor.samples();
    assert!(!samples.is_empty());
    for sample in &samples {
        assert_eq!(sample.gpu_mem_gb, 0.0);
        assert_eq!(sample.gpu_util_percent, 0.0);
        assert_eq!(sample.memory_gb, HOST_MEMORY_GB);
        assert_eq!(sample.cpu_percent, HOST_CPU_PERCENT);
    }

    let gpu_events = monitor.event_log(Some("GPU"));
    assert!(!gpu_events.is_empty());
    assert!(gpu_events.iter().all(|event| event.is_error));
}

#[test]
fn host_failure_ends_the_session() {
    let mut monitor =
        Monitor::with_probes(common::config(20), Box::new(FailingHost), Box::new(StaticGpu))
            .unwrap();

    monitor.start(false).unwrap();
    thread::sleep(Duration::from_millis(60));
    let err = monitor.stop().unwrap_err();
    assert!(matches!(err, MonitorError::ProviderFailure(_)));
    assert_eq!(monitor.sample_count(), 0);

    let errors: Vec<_> = monitor
        .event_log(None)
        .into_iter()
        .filter(|event| event.is_error)
        .collect();
    assert!(!errors.is_empty());

    // The probes were handed back, so a new session can be armed.
    monitor.start(false).unwrap();
    assert!(monitor.stop().is_err());
}

#[test]
fn stop_bounds_the_sample_count() {
    let mut monitor = static_monitor(50);

    monitor.start(false).unwrap();
    thread::sleep(Duration::from_millis(175));
    monitor.stop().unwrap();

    // Samples land at roughly 0/50/100/150 ms; scheduler slack may cost
    // one, and no sample may follow the stop request.
    let count = monitor.sample_count();
    assert!((2..=4).contains(&count), "unexpected sample count {count}");

    let samples = monitor.samples();
    assert!(samples
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));

    // After stop returns the log is stable.
    thread::sleep(Duration::from_millis(120));
    assert_eq!(monitor.sample_count(), count);
}

#[test]
fn summarize_reflects_the_static_probes() {
    let mut monitor = static_monitor(20);
    assert!(monitor.summarize().is_none());

    monitor.start(false).unwrap();
    thread::sleep(Duration::from_millis(70));
    monitor.stop().unwrap();

    let summary = monitor.summarize().unwrap();
    assert_eq!(summary.max_memory_gb, HOST_MEMORY_GB);
    assert_eq!(summary.mean_memory_gb, HOST_MEMORY_GB);
    assert_eq!(summary.peak_cpu_percent, HOST_CPU_PERCENT);
    assert_eq!(summary.max_gpu_mem_gb, GPU_MEM_GB);
    assert_eq!(summary.mean_gpu_util_percent, GPU_UTIL_PERCENT);
}

#[test]
fn dropping_a_running_monitor_joins_the_thread() {
    let mut monitor = static_monitor(20);
    monitor.start(false).unwrap();
    // Drop must signal and join the sampler without hanging.
    drop(monitor);
}
