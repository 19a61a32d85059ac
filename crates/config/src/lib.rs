//! Dynamic bot configuration: the persisted config row, the store trait,
//! and the in-memory cache the pipeline reads on every inbound message.

pub mod cache;
pub mod error;
pub mod schema;
pub mod store;

pub use {
    cache::{ConfigCache, DEFAULT_REFRESH_INTERVAL, RefreshTask},
    error::RefreshError,
    schema::BotConfig,
    store::{ConfigStore, StoredConfig},
};
