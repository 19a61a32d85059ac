//! Reply delivery and best-effort audit persistence.

use {
    tracing::warn,
    warble_channels::{AuditLog, AuditRecord, GatewayClient, MessageEvent},
};

use crate::error::{PipelineError, Result};

/// Send the response as a reply to the originating message, then persist
/// one audit record.
///
/// The reply is the authoritative outcome: a failed audit write is logged
/// and swallowed, while a failed send abandons the event with no record
/// written.
pub async fn dispatch(
    gateway: &dyn GatewayClient,
    audit: &dyn AuditLog,
    event: &MessageEvent,
    response_text: &str,
) -> Result<()> {
    gateway
        .reply(event, response_text)
        .await
        .map_err(PipelineError::Dispatch)?;

    let record = AuditRecord::new(
        event.author_handle.clone(),
        event.text.clone(),
        response_text,
    );
    if let Err(error) = audit.insert(record).await {
        warn!(
            %error,
            channel_id = %event.channel_id,
            message_id = %event.message_id,
            "audit log write failed after reply was sent"
        );
    }
    Ok(())
}
