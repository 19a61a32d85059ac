//! Per-event sequencing: admission → context → completion → dispatch.

use std::sync::Arc;

use {
    tracing::{debug, error, info},
    warble_channels::{AuditLog, GatewayClient, MAX_MESSAGE_LEN, MessageEvent, truncate_reply},
    warble_config::ConfigCache,
    warble_providers::CompletionClient,
};

use crate::{context, dispatch, error::Result};

/// Terminal state of one event's processing.
#[derive(Debug)]
pub enum Outcome {
    /// The admission gate declined the event; nothing else ran.
    Dropped,
    /// A reply was sent (and an audit record written best-effort).
    Replied,
    /// Processing aborted at some stage; the error has been logged.
    Failed(crate::PipelineError),
}

/// The message-processing pipeline.
///
/// Stateless across events: each inbound message is handled independently,
/// and concurrent events in the same channel may interleave their
/// completion calls. The config snapshot is read once per event.
pub struct Pipeline {
    cache: Arc<ConfigCache>,
    completion: Arc<dyn CompletionClient>,
    audit: Arc<dyn AuditLog>,
}

impl Pipeline {
    pub fn new(
        cache: Arc<ConfigCache>,
        completion: Arc<dyn CompletionClient>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            cache,
            completion,
            audit,
        }
    }

    /// Process one inbound event end to end.
    ///
    /// Never panics and never propagates: failures are logged and confined
    /// to this event.
    pub async fn handle(&self, gateway: &dyn GatewayClient, event: &MessageEvent) -> Outcome {
        let config = self.cache.current();
        if !warble_channels::is_admitted(&event.channel_id, event.author_is_bot, &config) {
            debug!(
                channel_id = %event.channel_id,
                author_is_bot = event.author_is_bot,
                "event dropped by admission gate"
            );
            return Outcome::Dropped;
        }

        match self.process(gateway, event, &config.system_instructions).await {
            Ok(()) => {
                info!(
                    channel_id = %event.channel_id,
                    message_id = %event.message_id,
                    "reply dispatched"
                );
                Outcome::Replied
            },
            Err(err) => {
                error!(
                    error = %err,
                    channel_id = %event.channel_id,
                    message_id = %event.message_id,
                    "message processing failed"
                );
                Outcome::Failed(err)
            },
        }
    }

    async fn process(
        &self,
        gateway: &dyn GatewayClient,
        event: &MessageEvent,
        system_instructions: &str,
    ) -> Result<()> {
        let request = context::build_request(gateway, &event.channel_id, system_instructions).await?;
        let answer = self.completion.complete(&request).await?;
        let reply = truncate_reply(&answer, MAX_MESSAGE_LEN);
        dispatch::dispatch(gateway, self.audit.as_ref(), event, &reply).await
    }
}
