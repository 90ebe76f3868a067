mod cli;

use std::sync::Arc;

use clap::Parser;
use cli::{BuildArgs, Cli, Commands};
use feedpub::{
    api,
    archive::EpubArchiveBuilder,
    config::Config,
    observability::{self, Metrics},
    pipeline::BookPipeline,
};
use tracing::info;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    observability::init_tracing();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Server(args) => api::run(config, args.address).await?,
        Commands::Build(args) => build(config, args).await?,
    }

    Ok(())
}

async fn build(config: Config, args: BuildArgs) -> Result<(), AnyError> {
    let url = api::parse_feed_url(Some(&args.url))?;

    let pipeline = BookPipeline::from_config(
        &config,
        Arc::new(EpubArchiveBuilder::new()),
        Arc::new(Metrics::new()),
    )?;
    let book = pipeline.build_publication(url.as_str()).await?;

    let output = book.write_to(args.output.as_deref()).await?;

    info!(path = %output.display(), size = book.bytes.len(), "Book written");
    Ok(())
}
