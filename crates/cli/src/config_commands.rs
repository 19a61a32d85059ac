use {anyhow::Result, clap::Subcommand};

use warble_config::{ConfigStore, StoredConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the stored configuration.
    Show,
    /// Replace the system instructions sent with every completion.
    SetInstructions {
        /// New instruction text.
        text: String,
    },
    /// Add a channel to the allow-list.
    AllowChannel {
        /// Discord channel id (numeric snowflake).
        channel_id: String,
    },
    /// Remove a channel from the allow-list.
    DenyChannel {
        /// Discord channel id (numeric snowflake).
        channel_id: String,
    },
}

pub async fn handle_config(store: &dyn ConfigStore, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show(store).await,
        ConfigAction::SetInstructions { text } => set_instructions(store, text).await,
        ConfigAction::AllowChannel { channel_id } => allow_channel(store, channel_id).await,
        ConfigAction::DenyChannel { channel_id } => deny_channel(store, channel_id).await,
    }
}

async fn load(store: &dyn ConfigStore) -> Result<StoredConfig> {
    Ok(store.fetch_config().await?.unwrap_or_default())
}

async fn show(store: &dyn ConfigStore) -> Result<()> {
    let config = load(store).await?;
    match config.system_instructions {
        Some(ref text) if !text.trim().is_empty() => {
            println!("system instructions: {text}");
        },
        _ => println!("system instructions: (default)"),
    }
    if config.allowed_channels.is_empty() {
        println!("allowed channels: (none — all messages are dropped)");
    } else {
        println!("allowed channels:");
        for id in &config.allowed_channels {
            println!("  {id}");
        }
    }
    Ok(())
}

async fn set_instructions(store: &dyn ConfigStore, text: &str) -> Result<()> {
    let mut config = load(store).await?;
    config.system_instructions = Some(text.to_owned());
    store.upsert_config(&config).await?;
    eprintln!("System instructions updated.");
    Ok(())
}

async fn allow_channel(store: &dyn ConfigStore, channel_id: &str) -> Result<()> {
    let mut config = load(store).await?;
    if config.allowed_channels.iter().any(|id| id == channel_id) {
        eprintln!("Channel {channel_id} is already allowed.");
        return Ok(());
    }
    config.allowed_channels.push(channel_id.to_owned());
    store.upsert_config(&config).await?;
    eprintln!("Channel {channel_id} allowed.");
    Ok(())
}

async fn deny_channel(store: &dyn ConfigStore, channel_id: &str) -> Result<()> {
    let mut config = load(store).await?;
    let before = config.allowed_channels.len();
    config.allowed_channels.retain(|id| id != channel_id);
    if config.allowed_channels.len() == before {
        eprintln!("Channel {channel_id} was not in the allow-list.");
        return Ok(());
    }
    store.upsert_config(&config).await?;
    eprintln!("Channel {channel_id} removed from the allow-list.");
    Ok(())
}
