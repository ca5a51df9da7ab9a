use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error variants shared by all docserve crates.
///
/// Batch operations (scanning, watching) do not propagate these directly;
/// they collect per-file errors alongside their results so one bad file
/// never aborts the rest of the work.
#[derive(Debug, Error)]
pub enum DocserveError {
    /// File system operation failed.
    #[error("file error at {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file exists but could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// HTTP server setup or request handling failed.
    #[error("http error: {0}")]
    Http(String),

    /// Catch-all for other errors with a message.
    #[error("{0}")]
    Message(String),
}

impl DocserveError {
    /// Create a `Message` error from anything string-like.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Create a `File` error for the given path.
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

/// Standard result type for docserve operations.
pub type DocserveResult<T> = Result<T, DocserveError>;
