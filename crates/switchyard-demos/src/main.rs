//! switchyard-demos server
//!
//! Serves the notes, guestbook and storage demos over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use switchyard_demos::{Config, Services, build_router, server};

/// Demo applications on the switchyard request pipeline.
#[derive(Parser)]
#[command(name = "switchyard-demos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration file.
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<SocketAddr>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    let addr = config.listen;

    let router = build_router(config, Services::in_memory()).context("invalid route table")?;
    for route in router.routes() {
        info!(method = %route.method, pattern = %route.full_pattern, "route");
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot listen on {addr}"))?;
    info!("listening on http://{addr}");

    server::serve(Arc::new(router), listener).await?;
    Ok(())
}
