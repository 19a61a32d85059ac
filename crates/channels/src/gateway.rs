use std::borrow::Cow;

use {async_trait::async_trait, serde::Serialize};

use crate::Result;

/// Maximum reply payload length the target gateway accepts.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// An inbound chat message, also the unit of fetched channel history.
#[derive(Debug, Clone, Serialize)]
pub struct MessageEvent {
    pub message_id: String,
    pub channel_id: String,
    pub author_id: String,
    /// Display handle used for audit records (e.g. "alice#0").
    pub author_handle: String,
    /// Whether the author is a bot account, including this bot itself.
    pub author_is_bot: bool,
    pub text: String,
}

/// Inbound event source plus outbound reply sink.
///
/// The pipeline never assumes a concrete client library; connectors adapt
/// their platform's types to this trait.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Fetch up to `limit` most recent messages in a channel, newest-first.
    async fn fetch_history(&self, channel_id: &str, limit: u8) -> Result<Vec<MessageEvent>>;

    /// Send `text` as a reply to the given message in its channel.
    async fn reply(&self, to: &MessageEvent, text: &str) -> Result<()>;
}

/// Clamp a reply to the transport limit.
///
/// Counts `char`s, never splitting a code point. Over-long text is cut to
/// `max_len - 3` characters with a trailing `"..."`, so the result is
/// exactly `max_len` characters.
pub fn truncate_reply(text: &str, max_len: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_len {
        return Cow::Borrowed(text);
    }
    let mut cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
    cut.push_str("...");
    Cow::Owned(cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reply_passes_through() {
        let text = "Hello!";
        assert!(matches!(truncate_reply(text, 2000), Cow::Borrowed(_)));
    }

    #[test]
    fn exact_limit_passes_through() {
        let text = "x".repeat(2000);
        assert_eq!(truncate_reply(&text, 2000), text);
    }

    #[test]
    fn overlong_reply_is_cut_to_limit_with_ellipsis() {
        let text = "x".repeat(2500);
        let clamped = truncate_reply(&text, 2000);
        assert_eq!(clamped.chars().count(), 2000);
        assert!(clamped.ends_with("..."));
        assert_eq!(&clamped[..1997], &text[..1997]);
    }

    #[test]
    fn multibyte_text_never_splits_a_code_point() {
        let text = "ü".repeat(2100);
        let clamped = truncate_reply(&text, 2000);
        assert_eq!(clamped.chars().count(), 2000);
        assert!(clamped.ends_with("..."));
        assert!(clamped.chars().take(1997).all(|c| c == 'ü'));
    }
}
