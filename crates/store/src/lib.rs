//! SQLite persistence for the bot config row and the audit log.

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Run database migrations for the store crate.
///
/// Creates the `bot_config` and `chat_logs` tables. Called by
/// [`SqliteStore::new`]; invoke directly when sharing an existing pool.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
