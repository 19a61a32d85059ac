/// Result type for per-event pipeline processing.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Where an event's processing failed. Every variant aborts only that
/// event; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Channel history could not be fetched; no reply, no audit record.
    #[error("history fetch failed: {0}")]
    Fetch(#[source] warble_channels::Error),

    /// The completion call failed or returned unusable output.
    #[error("completion failed: {0}")]
    Completion(#[from] warble_providers::Error),

    /// The reply send failed; no audit record is written.
    #[error("reply dispatch failed: {0}")]
    Dispatch(#[source] warble_channels::Error),
}
