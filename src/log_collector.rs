//! Decoupled logging pipeline for dashboard sessions.
//!
//! All `log::*` macros are routed through a single channel to a background
//! writer thread, so neither the sample worker nor the poll loop ever blocks
//! on disk I/O.
//!
//! # Architecture
//!
//! ```text
//! log::info!() / log::warn!() ...
//!     |
//! [LogCollector] (log::Log impl, non-blocking)
//!     | (crossbeam unbounded channel)
//!     v
//! [Disk persister thread]
//!     |-- logs/<YYYYmmdd_HHMMSS>_session.log   (every record)
//!     '-- stdout                               (target "status" only)
//! ```
//!
//! Records logged with `target: "status"` are the human-facing status line
//! of the headless driver and are echoed to stdout as well as persisted.

use crossbeam_channel::{unbounded, Sender};
use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Target whose records are echoed to stdout
pub const STATUS_TARGET: &str = "status";

/// Internal log line or special marker
enum LogMessage {
    /// Regular log line
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// Get the default logs path relative to the current working directory: ./logs
pub fn get_global_logs_path() -> Result<PathBuf, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Failed to get current working directory: {}", e))?;
    Ok(cwd.join("logs"))
}

/// Ensure the logs directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// A log line with metadata
#[derive(Clone, Debug)]
pub struct LogLine {
    pub message: String,
    pub level: Level,
    pub target: String,
    /// Wall-clock time the line was created (HH:MM:SS.mmm)
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        LogLine {
            message: message.into(),
            level,
            target: target.into(),
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    pub fn is_status(&self) -> bool {
        self.target == STATUS_TARGET
    }

    /// Line as written to the session log file
    pub fn formatted(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Writer side of the persister thread.
///
/// The logger has nowhere to log its own failures, so the first failed
/// write goes to stderr and later ones are only counted.
struct LogSink<W: Write> {
    out: W,
    failures: u64,
}

impl<W: Write> LogSink<W> {
    fn new(out: W) -> Self {
        LogSink { out, failures: 0 }
    }

    fn write_line(&mut self, line: &LogLine) {
        if let Err(e) = writeln!(self.out, "{}", line.formatted()) {
            self.report(e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            self.report(e);
        }
    }

    fn report(&mut self, e: io::Error) {
        if self.failures == 0 {
            eprintln!(
                "[LOG] Failed to write session log: {} (further failures are not reported)",
                e
            );
        }
        self.failures += 1;
    }
}

/// Channel-backed logger writing one file per session
pub struct LogCollector {
    /// crossbeam unbounded sender, safe from any thread or runtime
    tx: Sender<LogMessage>,
    /// Session log file
    log_path: PathBuf,
    max_level: LevelFilter,
}

impl LogCollector {
    /// Create the session log file and start the background writer
    pub fn new(log_dir: PathBuf, max_level: LevelFilter) -> Result<Self, String> {
        ensure_logs_dir_exists(&log_dir)?;

        let log_path = log_dir.join(format!(
            "{}_session.log",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| format!("Failed to open log file {}: {}", log_path.display(), e))?;

        let (tx, rx) = unbounded::<LogMessage>();

        std::thread::Builder::new()
            .name("log-collector".to_string())
            .spawn(move || {
                let mut sink = LogSink::new(file);
                while let Ok(msg) = rx.recv() {
                    match msg {
                        LogMessage::Line(line) => {
                            sink.write_line(&line);
                            if line.is_status() {
                                println!("{}", line.message);
                            }
                        }
                        LogMessage::Flush(done) => {
                            sink.flush();
                            let _ = done.send(());
                        }
                    }
                }
                sink.flush();
            })
            .map_err(|e| format!("Failed to spawn log collector thread: {}", e))?;

        Ok(LogCollector {
            tx,
            log_path,
            max_level,
        })
    }

    /// Register a clone of this collector as the global `log` backend
    pub fn install(&self) -> Result<(), String> {
        log::set_boxed_logger(Box::new(self.clone()))
            .map(|()| log::set_max_level(self.max_level))
            .map_err(|e| format!("Failed to set global logger: {}", e))
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Queue a line (non-blocking, never fails while the writer is alive)
    pub fn log_line(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Block until every line queued before this call is on disk
    pub fn wait_for_empty(&self) -> Result<(), String> {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        rx.recv()
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

impl Clone for LogCollector {
    fn clone(&self) -> Self {
        LogCollector {
            tx: self.tx.clone(),
            log_path: self.log_path.clone(),
            max_level: self.max_level,
        }
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_line(LogLine::new(
                record.level(),
                record.target(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {
        let _ = self.wait_for_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_log_collector_creates_session_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let collector = LogCollector::new(log_dir.clone(), LevelFilter::Info).unwrap();
        assert!(log_dir.exists());
        assert!(collector.log_path().exists());
        assert!(collector
            .log_path()
            .to_string_lossy()
            .ends_with("_session.log"));
    }

    #[test]
    fn test_lines_persist_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), LevelFilter::Info).unwrap();

        for i in 0..200 {
            collector.log_line(LogLine::new(Level::Info, "test", format!("line {}", i)));
        }
        collector.wait_for_empty().unwrap();

        let content = fs::read_to_string(collector.log_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        assert!(lines[0].ends_with("[INFO] line 0"));
        assert!(lines[199].ends_with("[INFO] line 199"));
    }

    /// Writer that fails every call, like a full disk
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }
    }

    #[test]
    fn test_sink_counts_write_failures() {
        let mut sink = LogSink::new(FullDisk);
        sink.write_line(&LogLine::new(Level::Info, "test", "first"));
        sink.write_line(&LogLine::new(Level::Info, "test", "second"));
        sink.flush();
        assert_eq!(sink.failures, 3);
    }

    #[test]
    fn test_sink_writes_formatted_lines() {
        let mut sink = LogSink::new(Vec::new());
        sink.write_line(&LogLine::new(Level::Error, "test", "export failed"));
        sink.flush();
        assert_eq!(sink.failures, 0);

        let written = String::from_utf8(sink.out).unwrap();
        assert!(written.ends_with("[ERROR] export failed\n"));
    }

    #[test]
    fn test_line_format() {
        let line = LogLine::new(Level::Warn, STATUS_TARGET, "Session paused at step 3");
        assert!(line.is_status());
        let formatted = line.formatted();
        // [HH:MM:SS.mmm] [WARN] message
        assert_eq!(&formatted[0..1], "[");
        assert_eq!(&formatted[13..14], "]");
        assert!(formatted.ends_with("[WARN] Session paused at step 3"));
    }

    #[test]
    fn test_level_filter() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), LevelFilter::Info).unwrap();

        let debug = Metadata::builder().level(Level::Debug).target("x").build();
        let warn = Metadata::builder().level(Level::Warn).target("x").build();
        assert!(!collector.enabled(&debug));
        assert!(collector.enabled(&warn));
    }

    // The only test that installs the global logger
    #[test]
    fn test_install_routes_log_macros() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), LevelFilter::Info).unwrap();

        collector.install().unwrap();
        assert_eq!(log::max_level(), LevelFilter::Info);
        log::warn!("installed collector sees this");
        log::logger().flush();

        let content = fs::read_to_string(collector.log_path()).unwrap();
        assert!(content.contains("[WARN] installed collector sees this"));

        // A second global logger is refused
        assert!(collector.install().is_err());
    }

    #[test]
    fn test_log_trait_routes_records() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), LevelFilter::Info).unwrap();

        collector.log(
            &Record::builder()
                .args(format_args!("worker started"))
                .level(Level::Info)
                .target("async_dashboard")
                .build(),
        );
        collector.log(
            &Record::builder()
                .args(format_args!("noisy detail"))
                .level(Level::Trace)
                .target("async_dashboard")
                .build(),
        );
        Log::flush(&collector);

        let content = fs::read_to_string(collector.log_path()).unwrap();
        assert!(content.contains("[INFO] worker started"));
        assert!(!content.contains("noisy detail"));
    }
}
