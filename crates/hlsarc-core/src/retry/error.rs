//! Retrieval error type for retry classification.

/// Error returned by one fetch attempt. Classified before deciding a retry.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{url}: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// HTTP response had a non-2xx status.
    #[error("{url}: HTTP {status}")]
    Http { url: String, status: u32 },
    /// The transfer was stopped through its abort token.
    #[error("{url}: transfer aborted")]
    Aborted { url: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Curl { url, .. } | FetchError::Http { url, .. } | FetchError::Aborted { url } => url,
        }
    }
}
