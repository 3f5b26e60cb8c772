mod fetch;
mod scan;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "aether-cli")]
#[command(about = "Aether competitor scan command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Scan one competitor and print the JSON summary
    Scan {
        /// User the scan runs for; must own the competitor
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        competitor_id: i64,
    },
    /// Run and store one brand-sentiment scan for a user's own channels
    Sentiment {
        #[arg(long)]
        user_id: String,

        #[command(flatten)]
        handles: HandleArgs,
    },
    /// Fetch and normalize a single source without storing or analyzing it
    Fetch {
        #[command(flatten)]
        target: FetchTarget,
    },
}

#[derive(Debug, Args)]
struct HandleArgs {
    /// YouTube channel name or search term
    #[arg(long)]
    youtube: Option<String>,

    /// Subreddit (`r/name`) or search term
    #[arg(long)]
    reddit: Option<String>,

    /// Accepted for parity with the API; not collected
    #[arg(long)]
    twitter: Option<String>,
}

#[derive(Debug, Args)]
struct FetchTarget {
    /// Website URL to fetch
    #[arg(long, conflicts_with_all = ["platform", "handle"], required_unless_present = "platform")]
    url: Option<String>,

    /// Social platform of `--handle`
    #[arg(long, requires = "handle")]
    platform: Option<String>,

    /// Profile handle or URL for `--platform`
    #[arg(long, requires = "platform")]
    handle: Option<String>,
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Loads the full config (requires `DATABASE_URL`) and starts logging.
fn load_config() -> anyhow::Result<aether_core::AppConfig> {
    let config = aether_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => scan::run_migrate(&load_config()?).await,
        Commands::Scan {
            user_id,
            competitor_id,
        } => scan::run_scan_command(&load_config()?, &user_id, competitor_id).await,
        Commands::Sentiment { user_id, handles } => {
            scan::run_sentiment_command(&load_config()?, &user_id, handles).await
        }
        Commands::Fetch { target } => {
            // No database needed; logging falls back to the env level.
            let level = std::env::var("AETHER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            init_tracing(&level)?;
            fetch::run_fetch(&target).await
        }
    }
}
