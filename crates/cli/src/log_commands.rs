use anyhow::Result;

use warble_channels::AuditLog;

/// Print the most recent chat log entries, oldest first.
pub async fn show_logs(audit: &dyn AuditLog, limit: u32) -> Result<()> {
    let records = audit.list_recent(limit).await?;
    if records.is_empty() {
        eprintln!("No chat log entries.");
        return Ok(());
    }
    for record in records {
        println!(
            "[{}] {}: {}",
            record.created_at, record.user_handle, record.message_text
        );
        println!("    -> {}", record.response_text);
    }
    Ok(())
}
