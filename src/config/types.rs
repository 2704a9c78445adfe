// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
///
/// `root` is whatever the user supplied; the canonical form lives in `AppState`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root: String,
    pub workers: Option<usize>,
    /// Open the served URL in the default browser once listening
    pub open_browser: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written (error, warn, info, debug)
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Serve further requests on the same connection after a response
    pub keep_alive: bool,
    /// Seconds a client may take to send complete request headers; 0 disables the limit
    pub read_timeout: u64,
}

impl PerformanceConfig {
    /// Limit on receiving request headers. Response bodies are never cut off by it.
    pub fn header_read_timeout(&self) -> Option<std::time::Duration> {
        (self.read_timeout > 0).then(|| std::time::Duration::from_secs(self.read_timeout))
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}
