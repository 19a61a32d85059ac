//! SQLite-backed config and audit stores using sqlx.

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions},
};

use {
    warble_channels::{
        AuditLog, AuditRecord,
        error::Error as ChannelError,
    },
    warble_config::{ConfigStore, StoredConfig},
};

/// SQLite-backed persistence for the config row and chat logs.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with its own connection pool and run migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("failed to connect to SQLite")?;

        crate::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store using an existing pool (migrations must already be run).
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigStore for SqliteStore {
    async fn fetch_config(&self) -> Result<Option<StoredConfig>> {
        let row = sqlx::query(
            "SELECT system_instructions, allowed_channels FROM bot_config WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let system_instructions: Option<String> = row.get("system_instructions");
        let channels_json: String = row.get("allowed_channels");
        let allowed_channels: Vec<String> = serde_json::from_str(&channels_json)
            .context("allowed_channels column is not a JSON string array")?;

        Ok(Some(StoredConfig {
            system_instructions,
            allowed_channels,
        }))
    }

    async fn upsert_config(&self, config: &StoredConfig) -> Result<()> {
        let channels_json = serde_json::to_string(&config.allowed_channels)?;
        sqlx::query(
            "INSERT INTO bot_config (id, system_instructions, allowed_channels)
             VALUES (1, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 system_instructions = excluded.system_instructions,
                 allowed_channels = excluded.allowed_channels",
        )
        .bind(&config.system_instructions)
        .bind(&channels_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for SqliteStore {
    async fn insert(&self, record: AuditRecord) -> warble_channels::Result<()> {
        sqlx::query(
            "INSERT INTO chat_logs (user_handle, message_content, bot_response, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.user_handle)
        .bind(&record.message_text)
        .bind(&record.response_text)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ChannelError::external("audit record insert", e))?;
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> warble_channels::Result<Vec<AuditRecord>> {
        let rows = sqlx::query(
            "SELECT user_handle, message_content, bot_response, created_at
             FROM chat_logs
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChannelError::external("audit log query", e))?;

        let mut records = rows
            .into_iter()
            .map(|row| AuditRecord {
                user_handle: row.get("user_handle"),
                message_text: row.get("message_content"),
                response_text: row.get("bot_response"),
                created_at: row.get("created_at"),
            })
            .collect::<Vec<_>>();
        // Oldest first, consistent with history ordering elsewhere.
        records.reverse();
        Ok(records)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    async fn make_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn fetch_config_empty_database() {
        let store = make_store().await;
        assert!(store.fetch_config().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn config_roundtrip() {
        let store = make_store().await;
        store
            .upsert_config(&StoredConfig {
                system_instructions: Some("Be terse.".into()),
                allowed_channels: vec!["42".into(), "7".into()],
            })
            .await
            .unwrap();

        let stored = store.fetch_config().await.unwrap().unwrap();
        assert_eq!(stored.system_instructions.as_deref(), Some("Be terse."));
        assert_eq!(stored.allowed_channels, vec!["42", "7"]);
    }

    #[tokio::test]
    async fn config_upsert_replaces_single_row() {
        let store = make_store().await;
        for channels in [vec!["1".to_string()], vec!["2".to_string()]] {
            store
                .upsert_config(&StoredConfig {
                    system_instructions: None,
                    allowed_channels: channels,
                })
                .await
                .unwrap();
        }

        let stored = store.fetch_config().await.unwrap().unwrap();
        assert_eq!(stored.allowed_channels, vec!["2"]);
        assert!(stored.system_instructions.is_none());
    }

    #[tokio::test]
    async fn audit_insert_and_list() {
        let store = make_store().await;
        for i in 0..5 {
            store
                .insert(AuditRecord {
                    user_handle: format!("user{i}"),
                    message_text: format!("msg{i}"),
                    response_text: format!("reply{i}"),
                    created_at: 1000 + i,
                })
                .await
                .unwrap();
        }

        let records = store.list_recent(3).await.unwrap();
        assert_eq!(records.len(), 3);
        // Last 3, oldest first.
        assert_eq!(records[0].user_handle, "user2");
        assert_eq!(records[2].user_handle, "user4");
        assert_eq!(records[2].response_text, "reply4");
    }

    #[tokio::test]
    async fn audit_list_empty() {
        let store = make_store().await;
        assert!(store.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn config_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/warble.db?mode=rwc", dir.path().display());

        {
            let store = SqliteStore::new(&url).await.unwrap();
            store
                .upsert_config(&StoredConfig {
                    system_instructions: Some("Be terse.".into()),
                    allowed_channels: vec!["42".into()],
                })
                .await
                .unwrap();
        }

        let reopened = SqliteStore::new(&url).await.unwrap();
        let stored = reopened.fetch_config().await.unwrap().unwrap();
        assert_eq!(stored.allowed_channels, vec!["42"]);
    }
}
