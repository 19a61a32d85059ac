use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Default system instructions used until a config row is loaded.
pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "You are a helpful assistant.";

/// The effective bot configuration the pipeline reads per message.
///
/// Mutated only through the admin surface; the pipeline treats every
/// snapshot as read-only. An empty `allowed_channels` set means the bot
/// never responds anywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotConfig {
    /// System prompt prepended to every completion request.
    pub system_instructions: String,

    /// Channel IDs the bot is allowed to respond in.
    pub allowed_channels: HashSet<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            system_instructions: DEFAULT_SYSTEM_INSTRUCTIONS.to_string(),
            allowed_channels: HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_no_channels() {
        let config = BotConfig::default();
        assert!(config.allowed_channels.is_empty());
        assert_eq!(config.system_instructions, DEFAULT_SYSTEM_INSTRUCTIONS);
    }
}
