//! Local HTTP file server
//!
//! Serves one directory tree: files are streamed as-is, directories are
//! rendered as HTML listings, and every request path is confined to the
//! configured root before the filesystem is touched.

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{AppState, Config};
pub use error::{ServeError, StartupError};
