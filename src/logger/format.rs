//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::{DateTime, Local};
use serde_json::json;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One completed request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    /// When the request arrived
    pub time: DateTime<Local>,
    pub method: String,
    /// Raw (still percent-encoded) request path
    pub path: String,
    /// HTTP version (1.0, 1.1)
    pub http_version: String,
    pub status: u16,
    /// Body size announced in `Content-Length`, 0 when absent
    pub body_bytes: u64,
    pub user_agent: Option<String>,
    /// Time spent producing the response, in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create an entry stamped with the current local time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the entry according to `format`
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"-\" \"{}\"",
                self.format_common(),
                self.user_agent.as_deref().unwrap_or("-")
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.path, self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$status`,
    /// `$body_bytes_sent`, `$http_user_agent`, `$request_time` (seconds, 3 decimals).
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first: `$request_time` and `$request_uri` before `$request`
        let variables = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.path.clone()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            (
                "$http_user_agent",
                self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ];

        // One pass over the pattern; substituted values are never scanned again
        let mut line = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;
        while let Some(pos) = rest.find('$') {
            line.push_str(&rest[..pos]);
            rest = &rest[pos..];
            match variables.iter().find(|(name, _)| rest.starts_with(name)) {
                Some((name, value)) => {
                    line.push_str(value);
                    rest = &rest[name.len()..];
                }
                None => {
                    line.push('$');
                    rest = &rest[1..];
                }
            }
        }
        line.push_str(rest);
        line
    }
}
