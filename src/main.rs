use std::time::Instant;

use log::LevelFilter;
use tokio::signal::unix::{signal, SignalKind};

use async_dashboard::config::loader::{get_global_settings_path, load_or_default};
use async_dashboard::log_collector::get_global_logs_path;
use async_dashboard::{LogCollector, SessionController};

/// Headless poll driver.
///
/// Starts one session, drains and reports status at the configured cadence,
/// toggles pause on SIGUSR1, and on Ctrl-C (or after `run_duration_secs`)
/// stops the worker, exports the buffer to CSV and clears the session.
#[tokio::main]
async fn main() -> async_dashboard::Result<()> {
    // =========================================================================
    // SETTINGS AND LOGGING
    // =========================================================================
    let settings_path = get_global_settings_path()?;
    let config = load_or_default(&settings_path)?;

    let log_dir = match &config.log_dir {
        Some(dir) => dir.clone(),
        None => get_global_logs_path()?,
    };
    let collector = LogCollector::new(log_dir, LevelFilter::Info)?;
    collector.install()?;
    log::info!(
        "Async Dashboard {} logging to {}",
        async_dashboard::VERSION,
        collector.log_path().display()
    );

    // =========================================================================
    // SESSION START
    // =========================================================================
    let mut controller = SessionController::new(config.timing());
    if let Err(e) = controller.start() {
        log::error!("Could not start sampling: {}", e);
        collector.wait_for_empty()?;
        return Err(e.into());
    }

    // =========================================================================
    // POLL LOOP
    // =========================================================================
    let cadence = config.cadence();
    let deadline = config.deadline_from(Instant::now());
    let mut pause_signal = signal(SignalKind::user_defined1())?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        controller.drain_into_buffer();
        let status = controller.status();
        log::info!(target: "status", "{}", status.status_line());

        if !status.is_active() {
            log::warn!("Worker exited without a stop request");
            break;
        }

        let mut wait = controller.refresh_interval(&cadence);
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                log::info!(target: "status", "Run duration reached");
                break;
            }
            wait = wait.min(remaining);
        }

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = pause_signal.recv() => controller.pause_toggle(),
            _ = &mut ctrl_c => {
                log::info!(target: "status", "Interrupted, stopping session");
                break;
            }
        }
    }

    // =========================================================================
    // SHUTDOWN: STOP, EXPORT, CLEAR
    // =========================================================================
    controller.stop();
    match controller.export_csv(&config.export_path) {
        Ok(()) => log::info!(
            target: "status",
            "Exported {} samples to {}",
            controller.samples().len(),
            config.export_path.display()
        ),
        Err(e) => log::error!("CSV export failed: {}", e),
    }
    controller.clear();

    collector.wait_for_empty()?;
    Ok(())
}
