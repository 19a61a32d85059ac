use std::time::{SystemTime, UNIX_EPOCH};

use {async_trait::async_trait, serde::Serialize};

use crate::Result;

/// One dispatched exchange, persisted after the reply is sent.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub user_handle: String,
    pub message_text: String,
    pub response_text: String,
    /// Unix seconds at record creation.
    pub created_at: i64,
}

impl AuditRecord {
    /// Build a record timestamped now.
    #[must_use]
    pub fn new(
        user_handle: impl Into<String>,
        message_text: impl Into<String>,
        response_text: impl Into<String>,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        Self {
            user_handle: user_handle.into(),
            message_text: message_text.into(),
            response_text: response_text.into(),
            created_at,
        }
    }
}

/// Append-only audit sink for dispatched replies.
///
/// Writes are best-effort: the pipeline logs a failed insert and moves on,
/// never undoing the already-sent reply. The pipeline itself never reads
/// records back; `list_recent` serves the admin surface.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn insert(&self, record: AuditRecord) -> Result<()>;
    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditRecord>>;
}
