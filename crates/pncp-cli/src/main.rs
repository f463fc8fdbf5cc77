mod collect;
mod transform;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pncp-cli")]
#[command(about = "Collects PNCP contracts for a municipality and derives dashboard facts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch contracts from the PNCP API into the raw data directory
    Collect {
        /// Print the query window and endpoint without calling the API
        #[arg(long)]
        dry_run: bool,
    },
    /// Derive contract facts, supplier totals and flags from raw data
    Transform,
    /// Collect, then transform
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pncp_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(env = %config.env, data_dir = %config.data_dir.display(), "configuration loaded");

    let store = pncp_store::ArtifactStore::new(config.data_dir.clone());
    let params = pncp_core::load_parametros(&config.params_path);

    match cli.command {
        Commands::Collect { dry_run } => {
            collect::run_collect(&config, &params, &store, dry_run).await?;
        }
        Commands::Transform => transform::run_transform(&store, &params)?,
        Commands::Run => {
            collect::run_collect(&config, &params, &store, false).await?;
            transform::run_transform(&store, &params)?;
        }
    }

    Ok(())
}
