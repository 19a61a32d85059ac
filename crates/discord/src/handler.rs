//! Discord event handler for serenity.

use std::sync::Arc;

use {
    serenity::{
        all::{Context, EventHandler, GatewayIntents, Message, Ready},
        async_trait,
    },
    tracing::{debug, info},
};

use warble_bot::{Outcome, Pipeline};

use crate::gateway::{DiscordGateway, message_event};

/// Bridges serenity gateway events into the message pipeline.
pub struct DiscordHandler {
    pipeline: Arc<Pipeline>,
}

impl DiscordHandler {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord gateway ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let event = message_event(&msg);
        let gateway = DiscordGateway::new(ctx.http.clone());

        // serenity dispatches each event on its own task; a stalled external
        // call here never blocks other events.
        match self.pipeline.handle(&gateway, &event).await {
            Outcome::Dropped => {
                debug!(channel_id = %event.channel_id, "inbound message not admitted");
            },
            // Replied and Failed are already logged by the pipeline.
            Outcome::Replied | Outcome::Failed(_) => {},
        }
    }
}
