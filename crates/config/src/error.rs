/// A config refresh failed and the cached snapshot was left untouched.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The config store could not be reached or rejected the fetch.
    #[error("config fetch failed: {0}")]
    Store(#[source] anyhow::Error),
}
