//! `GatewayClient` implementation over serenity's HTTP API.

use std::sync::Arc;

use serenity::all::{ChannelId, CreateMessage, GetMessages, Message, MessageId, MessageReference};

use warble_channels::{Error, GatewayClient, MessageEvent, Result};

/// History fetch and reply sink backed by Discord's REST API.
pub struct DiscordGateway {
    http: Arc<serenity::http::Http>,
}

impl DiscordGateway {
    pub fn new(http: Arc<serenity::http::Http>) -> Self {
        Self { http }
    }
}

#[serenity::async_trait]
impl GatewayClient for DiscordGateway {
    async fn fetch_history(&self, channel_id: &str, limit: u8) -> Result<Vec<MessageEvent>> {
        let channel = ChannelId::new(parse_snowflake(channel_id, "channel id")?);
        let messages = channel
            .messages(&self.http, GetMessages::new().limit(limit))
            .await
            .map_err(|e| Error::external("discord history fetch", e))?;

        // Discord returns newest-first; callers reorder.
        Ok(messages.iter().map(message_event).collect())
    }

    async fn reply(&self, to: &MessageEvent, text: &str) -> Result<()> {
        let channel = ChannelId::new(parse_snowflake(&to.channel_id, "channel id")?);
        let message = MessageId::new(parse_snowflake(&to.message_id, "message id")?);

        let builder = CreateMessage::new()
            .content(text)
            .reference_message(MessageReference::from((channel, message)));
        channel
            .send_message(&self.http, builder)
            .await
            .map_err(|e| Error::external("discord reply send", e))?;
        Ok(())
    }
}

/// Map a serenity message to the pipeline's event shape.
pub(crate) fn message_event(message: &Message) -> MessageEvent {
    MessageEvent {
        message_id: message.id.get().to_string(),
        channel_id: message.channel_id.get().to_string(),
        author_id: message.author.id.get().to_string(),
        author_handle: message.author.tag(),
        author_is_bot: message.author.bot,
        text: message.content.clone(),
    }
}

fn parse_snowflake(value: &str, what: &str) -> Result<u64> {
    let id: u64 = value
        .parse()
        .map_err(|_| Error::invalid_input(format!("{what} is not a numeric snowflake: {value}")))?;
    if id == 0 {
        return Err(Error::invalid_input(format!("{what} must be non-zero")));
    }
    Ok(id)
}
