use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brook::app::AppContext;
use brook::cli::{commands, Cli, Commands};
use brook::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(&config)?;

    match cli.command {
        Commands::Ingest { channel, path } => {
            commands::ingest(&ctx, &channel, &path)?;
        }
        Commands::Fetch { channel, urls } => {
            commands::fetch(&ctx, &channel, urls).await?;
        }
        Commands::Timeline {
            channel,
            before,
            after,
        } => {
            commands::show_timeline(&ctx, &channel, before.as_deref(), after.as_deref())?;
        }
        Commands::Count { channel } => {
            commands::count(&ctx, &channel)?;
        }
        Commands::MarkRead { channel, ids } => {
            commands::mark_read(&ctx, &channel, &ids)?;
        }
        Commands::Channels => {
            commands::list_channels(&ctx);
        }
    }

    Ok(())
}
