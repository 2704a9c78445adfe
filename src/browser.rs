//! Opens the served directory in the user's default browser

use std::net::SocketAddr;

use crate::logger;

/// URL a browser on this machine can reach the server at
///
/// Wildcard and loopback binds are addressed as `localhost`.
pub fn browser_url(addr: SocketAddr) -> String {
    let ip = addr.ip();
    if ip.is_unspecified() || ip.is_loopback() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{addr}")
    }
}

/// Launch the browser without blocking the runtime. Failure is logged, never fatal.
pub fn open_in_browser(addr: SocketAddr) {
    let url = browser_url(addr);
    tokio::task::spawn_blocking(move || match open::that(&url) {
        Ok(()) => logger::log_info(&format!("Opened browser at {url}")),
        Err(e) => logger::log_warning(&format!("Failed to open browser: {e}")),
    });
}
