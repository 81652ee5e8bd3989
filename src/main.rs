//! talkback - IRC auto-responder.

use clap::Parser;
use std::path::PathBuf;
use talkback::config::{self, Config};
use talkback::TalkbackService;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "talkback", version, about = "IRC bot that talks back")]
struct Args {
    /// Configuration file.
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    let config = Config::load(&args.config).map_err(|e| {
        error!(path = %args.config.display(), error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %args.config.display(), "{}", e);
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    info!(
        endpoint = %config.irc.endpoint,
        channel = %config.irc.channel,
        nickname = %config.irc.nickname,
        triggers = config.talkback.triggers.len(),
        "Starting talkback"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, stopping");
            let _ = shutdown_tx.send(true);
        }
    });

    TalkbackService::from_config(&config).run(shutdown_rx).await?;

    info!("talkback stopped");
    Ok(())
}
