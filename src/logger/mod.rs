//! Logger module
//!
//! Provides logging utilities for the file server including:
//! - Server lifecycle logging
//! - Per-request logging and access logs in several formats
//! - Error, warning and debug logging with a configurable minimum level
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use chrono::{Local, SecondsFormat};
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

/// Log severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Whether a message at `level` passes a writer configured with `self`
    pub fn allows(self, level: Self) -> bool {
        level <= self
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. An unknown level falls back to `info`.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config.logging.level.parse().unwrap_or_else(|e| {
        eprintln!("[WARN] {e}, using info");
        LogLevel::Info
    });
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        level,
    )
}

fn write(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= LogLevel::Warn => eprintln!("{message}"),
        None if level == LogLevel::Info => println!("{message}"),
        None => {}
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    write(LogLevel::Info, "======================================");
    write(LogLevel::Info, "File server started successfully");
    write(LogLevel::Info, &format!("Serving files from: {}", root.display()));
    write(LogLevel::Info, &format!("Listening on: http://{addr}"));
    write(LogLevel::Info, &format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write(LogLevel::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(LogLevel::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(LogLevel::Info, &format!("Error log: {path}"));
    }
    write(LogLevel::Info, "======================================\n");
}

/// Written before a request is processed, whatever `logging.level` says
pub fn log_request(method: &hyper::Method, path: &str) {
    write_access(&request_line(method, path));
}

fn request_line(method: &hyper::Method, path: &str) -> String {
    format!("[{}] {method} {path}", timestamp())
}

/// A request the path resolver turned away (malformed or escaping)
pub fn log_rejected(path: &str, reason: &str) {
    write(LogLevel::Warn, &format!("[WARN] [{}] Rejected {path}: {reason}", timestamp()));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(LogLevel::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write(LogLevel::Info, &format!("[INFO] {message}"));
}

pub fn log_debug(message: &str) {
    write(LogLevel::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_shutdown() {
    write(LogLevel::Info, "\n[Shutdown] Stopped accepting connections");
}
