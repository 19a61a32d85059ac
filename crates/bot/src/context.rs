//! Bounded context window assembly from channel history.

use {
    warble_channels::GatewayClient,
    warble_providers::{CompletionRequest, ConversationTurn, Role},
};

use crate::error::{PipelineError, Result};

/// Messages fetched per event: up to 5 prior turns plus the triggering
/// message.
pub const HISTORY_FETCH_LIMIT: u8 = 6;

/// Fetch recent channel history and assemble a completion request.
///
/// The gateway returns history newest-first; turns are reordered
/// oldest-first so the transcript preserves chronological causality, with
/// the triggering message last. Bot-authored messages map to
/// [`Role::Model`], everything else to [`Role::User`]. Text is carried
/// verbatim.
pub async fn build_request(
    gateway: &dyn GatewayClient,
    channel_id: &str,
    system_instructions: &str,
) -> Result<CompletionRequest> {
    let mut history = gateway
        .fetch_history(channel_id, HISTORY_FETCH_LIMIT)
        .await
        .map_err(PipelineError::Fetch)?;
    history.reverse();

    let turns = history
        .into_iter()
        .map(|message| ConversationTurn {
            role: if message.author_is_bot {
                Role::Model
            } else {
                Role::User
            },
            text: message.text,
        })
        .collect();

    Ok(CompletionRequest {
        system_instructions: system_instructions.to_string(),
        turns,
    })
}
