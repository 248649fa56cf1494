/// Error types shared by the analysis backends.
///
/// `ResourceUnavailable` and `Internal` are raised by the local pipeline and are
/// recovered by the fallback path; `Remote` is raised by the remote backend and
/// is always surfaced to the caller.
use crate::remote::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {resource} at line {line}: {message}")]
    Malformed {
        resource: &'static str,
        line: usize,
        message: String,
    },

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("linguistic resources were not loaded")]
    NotLoaded,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("linguistic resources unavailable: {0}")]
    ResourceUnavailable(#[from] ResourceError),

    #[error("internal analysis error: {0}")]
    Internal(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
