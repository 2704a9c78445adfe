//! Error types
//!
//! `ServeError` covers everything that can go wrong while answering one request.
//! `StartupError` covers failures that stop the process before it serves anything.

use hyper::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Per-request failure. Every variant is terminal for the request that raised it.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Request path could not be decoded or normalized
    #[error("malformed request path: {0}")]
    MalformedPath(String),

    /// Normalized path lies outside the served root
    #[error("path escapes served root: {}", .0.display())]
    PathEscape(PathBuf),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other filesystem failure (permissions, unreadable directory, ...)
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    /// Classify a filesystem error for `path`.
    ///
    /// A missing entry, or a file used as a directory (`notes.txt/x`), is a 404.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound(path),
            _ => Self::Io { path, source },
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPath(_) => StatusCode::BAD_REQUEST,
            Self::PathEscape(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client. Never includes filesystem paths.
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MalformedPath(_) => "Invalid path",
            Self::PathEscape(_) => "Access denied: Path outside directory",
            Self::NotFound(_) => "Not found",
            Self::Io { .. } => "Server error",
        }
    }
}

/// Process-level failure; reported by `main` before exiting non-zero.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("directory does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("invalid directory {}: {source}", path.display())]
    RootInvalid {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file: {0}")]
    Logger(#[source] io::Error),

    #[error("failed to build runtime: {0}")]
    Runtime(#[source] io::Error),
}
