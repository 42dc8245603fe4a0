//! Log routing for a terminal that is owned by the UI
//!
//! Records from the `log` facade are kept in a bounded in-memory console that
//! the right sidebar reads from, instead of being written to stdout/stderr.

use crate::consts::tui_consts::MAX_CONSOLE_LOGS;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => LogLevel::Trace,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Info => LogLevel::Info,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Error => LogLevel::Error,
        }
    }
}

pub fn get_rust_log_level() -> LogLevel {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    parse_rust_log_level(&rust_log)
}

pub fn parse_rust_log_level(rust_log: &str) -> LogLevel {
    // Handle common RUST_LOG formats
    let level_str = rust_log
        .split(',')
        .next()
        .unwrap_or(rust_log)
        .split('=')
        .next_back()
        .unwrap_or(rust_log)
        .trim()
        .to_lowercase();

    match level_str.as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info, // Default to info if parsing fails
    }
}

pub fn should_log(event_level: LogLevel, threshold: LogLevel) -> bool {
    event_level >= threshold
}

/// A single captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Local wall-clock time, `HH:MM:SS.mmm`.
    pub timestamp: String,
    pub level: LogLevel,
    /// Module path or explicit `target:` of the record.
    pub source: String,
    pub message: String,
}

impl ConsoleLine {
    pub fn new(level: LogLevel, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
            level,
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Shared handle to the bounded console ring buffer.
///
/// Cloning is cheap; every clone sees the same entries.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    entries: Arc<Mutex<VecDeque<ConsoleLine>>>,
    capacity: usize,
    dropped: Arc<AtomicU64>,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::with_capacity(MAX_CONSOLE_LOGS)
    }
}

impl ConsoleLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity: capacity.max(1),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ConsoleLine>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn append(entries: &mut VecDeque<ConsoleLine>, capacity: usize, line: ConsoleLine) {
        entries.push_back(line);
        while entries.len() > capacity {
            entries.pop_front();
        }
    }

    pub fn push(&self, line: ConsoleLine) {
        Self::append(&mut self.lock(), self.capacity, line);
    }

    /// Appends without blocking; a contended buffer drops the line and counts it.
    pub fn try_push(&self, line: ConsoleLine) {
        match self.entries.try_lock() {
            Ok(mut entries) => Self::append(&mut entries, self.capacity, line),
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// The newest `n` lines, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ConsoleLine> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// `(errors, warnings)` among the newest `window` lines, counted under one lock.
    pub fn severity_counts(&self, window: usize) -> (usize, usize) {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(window);
        entries
            .iter()
            .skip(skip)
            .fold((0, 0), |(errors, warnings), line| match line.level {
                LogLevel::Error => (errors + 1, warnings),
                LogLevel::Warn => (errors, warnings + 1),
                _ => (errors, warnings),
            })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// `log` backend that feeds a [`ConsoleLog`].
struct ConsoleLogger {
    console: ConsoleLog,
    threshold: LogLevel,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        should_log(metadata.level().into(), self.threshold)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Never block the render loop on logging.
        self.console.try_push(ConsoleLine::new(
            record.level().into(),
            record.target(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

/// Installs the console logger as the global `log` backend.
///
/// Returns the handle the UI reads from.
pub fn init_console_logger(threshold: LogLevel) -> Result<ConsoleLog, SetLoggerError> {
    let console = ConsoleLog::default();
    log::set_boxed_logger(Box::new(ConsoleLogger {
        console: console.clone(),
        threshold,
    }))?;
    log::set_max_level(threshold.into());
    Ok(console)
}
