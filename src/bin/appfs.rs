use anyhow::Result;
use appfs::cli::{execute, load_config, AppfsCli};
use appfs::files::Filesystem;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = AppfsCli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting appfs v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli).await?;
    let fs = Filesystem::new(config);

    if let Err(e) = execute(&cli, &fs).await {
        error!("{e:#}");
        std::process::exit(1);
    }

    Ok(())
}
