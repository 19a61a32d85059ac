use warble_config::BotConfig;

/// Decide whether an inbound message is eligible for pipeline processing.
///
/// Bot-authored messages are never admitted, which covers this bot's own
/// replies and prevents feedback loops. Otherwise admission is purely a
/// membership check against the configured allow-list: an empty list means
/// the bot responds nowhere.
#[must_use]
pub fn is_admitted(channel_id: &str, author_is_bot: bool, config: &BotConfig) -> bool {
    if author_is_bot {
        return false;
    }
    config.allowed_channels.contains(channel_id)
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, std::collections::HashSet};

    fn config_with(channels: &[&str]) -> BotConfig {
        BotConfig {
            allowed_channels: channels.iter().map(|c| c.to_string()).collect::<HashSet<_>>(),
            ..BotConfig::default()
        }
    }

    #[rstest]
    #[case::allowed_channel("42", false, &["42"], true)]
    #[case::unlisted_channel("7", false, &["42"], false)]
    #[case::bot_author_in_allowed_channel("42", true, &["42"], false)]
    #[case::empty_allowlist("42", false, &[], false)]
    #[case::empty_channel_id("", false, &[], false)]
    fn admission(
        #[case] channel_id: &str,
        #[case] author_is_bot: bool,
        #[case] allowed: &[&str],
        #[case] expected: bool,
    ) {
        assert_eq!(
            is_admitted(channel_id, author_is_bot, &config_with(allowed)),
            expected
        );
    }
}
