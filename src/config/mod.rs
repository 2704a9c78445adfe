// Configuration module entry point
// Layers defaults, an optional config file, environment variables and CLI flags

mod state;
mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_FILE: &str = "dirserve";

/// Values given on the command line; each one beats every other source
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub workers: Option<usize>,
    pub open_browser: Option<bool>,
}

impl Config {
    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DIRSERVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.root", ".")?
            .set_default("server.open_browser", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", concat!("dirserve/", env!("CARGO_PKG_VERSION")))?
            .set_override_option("server.root", overrides.root.clone())?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option(
                "server.workers",
                overrides.workers.and_then(|w| i64::try_from(w).ok()),
            )?
            .set_override_option("server.open_browser", overrides.open_browser)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| StartupError::InvalidAddress(addr))
    }

    /// Resolve `server.root` to its canonical absolute form.
    ///
    /// The root has to exist and be a directory, otherwise the server refuses to start.
    pub fn validate_root(&self) -> Result<PathBuf, StartupError> {
        canonical_root(Path::new(&self.server.root))
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, StartupError> {
    let canonical = match std::fs::canonicalize(root) {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StartupError::RootMissing(root.to_path_buf()));
        }
        Err(source) => {
            return Err(StartupError::RootInvalid {
                path: root.to_path_buf(),
                source,
            });
        }
    };

    let metadata = std::fs::metadata(&canonical).map_err(|source| StartupError::RootInvalid {
        path: canonical.clone(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(StartupError::RootNotDirectory(canonical));
    }

    Ok(canonical)
}
