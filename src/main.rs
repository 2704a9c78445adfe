use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dirserve::cli::Cli;
use dirserve::config::{AppState, Config};
use dirserve::error::StartupError;
use dirserve::{browser, logger, server};
use tokio::sync::Notify;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config, &cli.overrides())?;
    let root = cfg.validate_root()?;
    let addr = cfg.get_socket_addr()?;
    logger::init(&cfg).map_err(StartupError::Logger)?;

    // Size the runtime from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;
    runtime.block_on(async_main(cfg, root, addr))
}

async fn async_main(cfg: Config, root: PathBuf, addr: SocketAddr) -> Result<(), StartupError> {
    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;
    let bound = listener.local_addr().unwrap_or(addr);

    logger::log_server_start(&bound, &root, &cfg);
    if cfg.server.open_browser {
        browser::open_in_browser(bound);
    }

    let state = Arc::new(AppState::new(cfg, root));
    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    server::run_server_loop(listener, state, shutdown).await;
    Ok(())
}
