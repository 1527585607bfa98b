//! rfcalc-server: wireless calculation API
//!
//! Run with: cargo run -p rfcalc-server -- --bind 0.0.0.0:8000 --static-dir ./frontend

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rfcalc_core::config::RfcalcConfig;
use rfcalc_core::logging::{init_logging, LogLevel};
use rfcalc_server::{build_router, AppState, DisabledExplainer, Explainer, GeminiExplainer};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Environment variable consulted for the explainer key when the config has none.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Parser, Debug)]
#[command(name = "rfcalc-server")]
#[command(about = "Wireless link, OFDM, comm-chain and cellular calculators over HTTP")]
#[command(version)]
struct Cli {
    /// Config file (otherwise RFCALC_CONFIG, ./rfcalc.yaml, user and system dirs)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// TCP address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Directory with welcome.html, index.html and static/
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Turn off model explanations
    #[arg(long)]
    no_explain: bool,

    /// Print an example config and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", RfcalcConfig::example_yaml());
        return Ok(());
    }

    let mut config = match cli.config {
        Some(ref path) => RfcalcConfig::load_from(path)?,
        None => RfcalcConfig::load()?,
    }
    .with_api_key_from_env(API_KEY_ENV);

    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(dir) = cli.static_dir {
        config.server.static_dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.no_explain {
        config.explainer.enable = false;
    }

    config.validate().context("invalid configuration")?;
    init_logging(&config.logging).context("failed to open log file")?;

    let explainer: Arc<dyn Explainer> = if config.explainer.enable {
        let gemini = GeminiExplainer::new(&config.explainer)?;
        if !gemini.has_key() {
            warn!("no API key configured (set {API_KEY_ENV}); explanations will be reported as unavailable");
        }
        Arc::new(gemini)
    } else {
        Arc::new(DisabledExplainer)
    };

    let timeout = Duration::from_secs(config.explainer.timeout_secs.max(1));
    let state = Arc::new(AppState::new(explainer, timeout));
    let app = build_router(state, config.server.static_dir.clone());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, static_dir = ?config.server.static_dir, "rfcalc-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
