use thiserror::Error;

/// Errors returned by a [`StatefulSetFetcher`](crate::fetch::StatefulSetFetcher)
#[derive(Debug, Error)]
pub enum FetchError {
    /// The StatefulSet does not exist
    #[error("not found")]
    NotFound,

    /// The API server rejected the request
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Connection, TLS or decoding failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The caller cancelled the check before the fetch completed
    #[error("context cancelled")]
    Cancelled,

    /// The check deadline expired before the fetch completed
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

impl FetchError {
    /// Whether a later run may succeed without any change to the cluster
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::DeadlineExceeded => true,
            Self::Api { code, .. } => *code == 429 || *code >= 500,
            Self::NotFound | Self::Cancelled => false,
        }
    }
}

/// The check could not run to completion.
///
/// This is never a health verdict: an unhealthy StatefulSet is reported through
/// [`CheckResult`](crate::result::CheckResult).
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to retrieve StatefulSet '{name}' in namespace '{namespace}': {source}")]
    Fetch {
        name: String,
        namespace: String,
        #[source]
        source: FetchError,
    },
}

impl CheckError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { source, .. } => source.is_retryable(),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Fetch {
                source: FetchError::Cancelled | FetchError::DeadlineExceeded,
                ..
            }
        )
    }
}

pub type Result<T, E = CheckError> = std::result::Result<T, E>;
