// Server loop module
// Accepts connections until shutdown is requested

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::serve_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop
///
/// Every accepted connection is handed to its own task. The loop returns once
/// `shutdown` is notified; connections already in flight finish on their own.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
                        serve_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                logger::log_shutdown();
                break;
            }
        }
    }
}
