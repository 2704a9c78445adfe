// Application state module
// Immutable per-process state shared by every request handler

use std::path::{Path, PathBuf};

use super::types::Config;

/// Application state
///
/// Built once at startup and shared through `Arc`; nothing in here changes afterwards.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical absolute form of the served root
    root: PathBuf,
    /// Home directory of the invoking user, used only for display
    home_dir: Option<PathBuf>,
}

impl AppState {
    /// `root` must already be canonical (see `Config::validate_root`).
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self {
            config,
            root,
            home_dir: dirs::home_dir(),
        }
    }

    /// Override the home directory used for display paths
    #[must_use]
    pub fn with_home_dir(mut self, home_dir: Option<PathBuf>) -> Self {
        self.home_dir = home_dir;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }
}
