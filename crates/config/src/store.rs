use {anyhow::Result, async_trait::async_trait, serde::Serialize};

/// The single persisted configuration row, as stored.
///
/// `system_instructions` is nullable in storage; blank or missing values
/// fall back to whatever the cache currently holds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoredConfig {
    pub system_instructions: Option<String>,
    pub allowed_channels: Vec<String>,
}

/// Persistent storage for the bot configuration.
///
/// The pipeline only ever reads through [`fetch_config`]; the write side
/// exists for the admin surface.
///
/// [`fetch_config`]: ConfigStore::fetch_config
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the single config row. `Ok(None)` means no row has been
    /// written yet, which is not an error.
    async fn fetch_config(&self) -> Result<Option<StoredConfig>>;

    /// Create or replace the config row.
    async fn upsert_config(&self, config: &StoredConfig) -> Result<()>;
}
