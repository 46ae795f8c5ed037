use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use emoji_sync::{
    config::{Config, defaults::DEFAULT_CONFIG_FILE},
    discord::DiscordEmojiClient,
    emoji_cache::EmojiCache,
    errors::AppResult,
    observability,
    progress::ConsoleProgress,
    sync::{Reconciler, SyncOptions},
};

#[derive(Parser)]
#[command(name = "emoji-sync")]
#[command(version)]
#[command(about = "Keeps a Discord application's custom emojis in sync with a local image directory")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Directory holding the emoji images (overrides config file)
    #[arg(short = 'd', long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Cache file path (overrides config file)
    #[arg(long, value_name = "FILE")]
    cache_file: Option<PathBuf>,

    /// Error log path (overrides config file)
    #[arg(long, value_name = "FILE")]
    error_log: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from_file(&cli.config)?;

    // Override config with CLI arguments
    if let Some(image_dir) = cli.image_dir {
        config.image_directory = image_dir;
    }
    if let Some(cache_file) = cli.cache_file {
        config.cache_file = cache_file;
    }
    if let Some(error_log) = cli.error_log {
        config.error_log_file = error_log;
    }

    observability::init_logging(&cli.log_level, &config.error_log_file)?;
    info!("Starting emoji-sync v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", cli.config);

    if let Err(e) = sync(&config).await {
        error!("Emoji sync aborted: {}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Validate credentials, then run one reconciliation pass
async fn sync(config: &Config) -> AppResult<()> {
    // No network call happens before both credentials are present.
    let credentials = config.credentials()?;

    let cache = EmojiCache::load(&config.cache_file).await?;
    info!(
        "Loaded {} cache entries from {:?}",
        cache.len(),
        cache.path()
    );

    let client = DiscordEmojiClient::new(&config.api_base_url, &credentials)?;
    let mut reconciler = Reconciler::new(client, cache, &config.image_directory).with_options(
        SyncOptions {
            abort_on_list_failure: config.abort_on_list_failure,
        },
    );

    reconciler.run(&ConsoleProgress::new()).await?;
    Ok(())
}
