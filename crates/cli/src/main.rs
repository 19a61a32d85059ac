mod config_commands;
mod log_commands;

use std::{path::PathBuf, sync::Arc, time::Duration};

use {
    anyhow::Context as _,
    clap::{Parser, Subcommand},
    secrecy::Secret,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    warble_bot::Pipeline,
    warble_channels::AuditLog,
    warble_config::{ConfigCache, ConfigStore, DEFAULT_REFRESH_INTERVAL},
    warble_providers::{GeminiClient, GeminiConfig, gemini},
    warble_store::SqliteStore,
};

#[derive(Parser)]
#[command(name = "warble", about = "Warble — allow-listed Discord chat bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Path to the SQLite database file.
    #[arg(long, global = true, env = "WARBLE_DB", default_value = "warble.db")]
    database: PathBuf,

    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: Option<String>,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Model used for completions.
    #[arg(long, env = "GEMINI_MODEL", default_value = gemini::DEFAULT_MODEL)]
    model: String,

    /// Seconds between background config refreshes.
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
    refresh_interval_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve messages (default when no subcommand is
    /// provided).
    Run,
    /// List models the configured API key can use for completions.
    Models,
    /// Inspect or edit the stored bot configuration.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
    /// Show recent chat log entries.
    Logs {
        /// Maximum number of entries to print.
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn database_url(path: &std::path::Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

async fn open_store(cli: &Cli) -> anyhow::Result<Arc<SqliteStore>> {
    let store = SqliteStore::new(&database_url(&cli.database))
        .await
        .with_context(|| format!("failed to open database at {}", cli.database.display()))?;
    Ok(Arc::new(store))
}

fn completion_client(cli: &Cli) -> anyhow::Result<GeminiClient> {
    let api_key = cli
        .gemini_api_key
        .clone()
        .context("GEMINI_API_KEY is required")?;
    let client = GeminiClient::new(GeminiConfig {
        api_key: Secret::new(api_key),
        model: cli.model.clone(),
        ..GeminiConfig::default()
    })?;
    Ok(client)
}

async fn run_bot(cli: &Cli) -> anyhow::Result<()> {
    let token = cli
        .discord_token
        .clone()
        .context("DISCORD_TOKEN is required")?;
    let completion = completion_client(cli)?;

    let store = open_store(cli).await?;
    let cache = Arc::new(ConfigCache::new(
        Arc::clone(&store) as Arc<dyn ConfigStore>
    ));

    // Load the stored config before accepting any events; on failure the
    // bot starts with defaults and the background refresh retries.
    if let Err(error) = cache.refresh().await {
        warn!(%error, "initial config refresh failed, starting with defaults");
    }
    let refresh_task = cache.spawn_refresh(Duration::from_secs(cli.refresh_interval_secs));

    let pipeline = Arc::new(Pipeline::new(
        Arc::clone(&cache),
        Arc::new(completion),
        Arc::clone(&store) as Arc<dyn AuditLog>,
    ));

    tokio::select! {
        result = warble_discord::run(&token, pipeline) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        },
    }

    refresh_task.stop().await;
    Ok(())
}

async fn list_models(cli: &Cli) -> anyhow::Result<()> {
    let client = completion_client(cli)?;
    let models = client.list_generate_models().await?;
    if models.is_empty() {
        eprintln!("No generation-capable models available for this key.");
        return Ok(());
    }
    for model in models {
        println!("{model}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    match &cli.command {
        None | Some(Commands::Run) => {
            info!(version = env!("CARGO_PKG_VERSION"), "warble starting");
            run_bot(&cli).await
        },
        Some(Commands::Models) => list_models(&cli).await,
        Some(Commands::Config { action }) => {
            let store = open_store(&cli).await?;
            config_commands::handle_config(store.as_ref(), action).await
        },
        Some(Commands::Logs { limit }) => {
            let store = open_store(&cli).await?;
            log_commands::show_logs(store.as_ref(), *limit).await
        },
    }
}
