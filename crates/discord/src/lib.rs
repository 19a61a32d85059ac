//! Discord connector: adapts serenity's gateway events and HTTP client to
//! the pipeline's channel traits.

pub mod gateway;
pub mod handler;

pub use {gateway::DiscordGateway, handler::DiscordHandler};

use std::sync::Arc;

use {anyhow::Context as _, warble_bot::Pipeline};

/// Connect to the Discord gateway and process events until the connection
/// ends or the process is shut down.
pub async fn run(token: &str, pipeline: Arc<Pipeline>) -> anyhow::Result<()> {
    let handler = DiscordHandler::new(pipeline);
    let mut client = serenity::Client::builder(token, DiscordHandler::intents())
        .event_handler(handler)
        .await
        .context("failed to build discord client")?;

    client
        .start()
        .await
        .context("discord gateway connection failed")?;
    Ok(())
}
