//! Command-line interface

use clap::Parser;

use crate::config::{Overrides, DEFAULT_CONFIG_FILE};

/// Browse and download a directory tree over HTTP
#[derive(Debug, Parser)]
#[command(name = "dirserve", version, about)]
pub struct Cli {
    /// Directory to serve files from
    #[arg(short, long)]
    pub dir: Option<String>,

    /// Port to run the server on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Number of runtime worker threads (defaults to CPU cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Do not open the served URL in a browser at startup
    #[arg(long)]
    pub no_browser: bool,

    /// Config file path without extension
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root: self.dir.clone(),
            host: self.host.clone(),
            port: self.port,
            workers: self.workers,
            open_browser: self.no_browser.then_some(false),
        }
    }
}
