/// Crate-wide result type for completion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Completion call failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No API key was configured.
    #[error("completion API key is missing")]
    MissingApiKey,

    /// HTTP transport failure (connect, timeout, body read).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The service answered 2xx but the payload was unusable.
    #[error("completion response unusable: {0}")]
    InvalidResponse(String),
}
