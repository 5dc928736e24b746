#![deny(missing_docs)]
//! Shared logging utilities for the storyreel workspace.
//!
//! This crate provides the `reel_*` logging macros used across the codebase,
//! the logger setup used by the dashboard binary and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! reel_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! reel_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! reel_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! reel_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! reel_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where log records end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the log file only. The terminal stays free for the dashboard.
    File,
    /// Write to both file and stderr.
    Both,
}

/// Terminal logging goes to stderr so it never interleaves with the
/// dashboard on stdout.
const TERMINAL_MODE: TerminalMode = TerminalMode::Stderr;

/// Logger settings resolved by the binary at startup.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Output destination.
    pub destination: LogDestination,
    /// Minimum level that is recorded.
    pub level: LevelFilter,
    /// Path of the log file, used for `File` and `Both`.
    pub file_path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: LevelFilter::Info,
            file_path: PathBuf::from("./storyreel.log"),
        }
    }
}

/// Initialize the global logger.
///
/// A file that cannot be created is reported on stderr and skipped; a
/// second initialization is silently ignored.
pub fn initialize(settings: &LogSettings) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if settings.destination == LogDestination::Both {
        loggers.push(TermLogger::new(
            settings.level,
            config.clone(),
            TERMINAL_MODE,
            ColorChoice::Auto,
        ));
    }
    if let Some(file_logger) = create_file_logger(settings.level, config, &settings.file_path) {
        loggers.push(file_logger);
    }

    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
