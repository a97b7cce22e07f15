mod config;

use anyhow::Result;
use config::RecorderConfig;
use oxprof_monitor::Monitor;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("oxprof=info".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RecorderConfig::load(&path)?,
        None => RecorderConfig::default(),
    };

    let mut monitor = Monitor::new(config.monitor.clone())?;
    monitor.start(config.append)?;
    tracing::info!(
        interval_ms = config.monitor.interval_ms,
        append = config.append,
        "recording; press Ctrl-C to stop"
    );

    signal::ctrl_c().await?;
    tracing::info!("shutting down");

    // Persist whatever was recorded before surfacing a fatal probe error
    // from the session.
    let stopped = monitor.stop();
    if config.monitor.log_path.is_some() {
        monitor.save(None)?;
    }
    match monitor.summarize() {
        Some(summary) => println!("{summary}"),
        None => println!("no samples recorded"),
    }
    stopped?;

    Ok(())
}
