use std::path::PathBuf;

use thiserror::Error;

/// Classifies suffix list download errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorKind {
    /// A single mirror could not be fetched
    Request,
    /// The downloaded body is not a usable suffix list
    Verification,
    /// Every configured mirror failed
    AllMirrorsFailed,
}

/// Suffix extraction error types
#[derive(Error, Debug)]
pub enum TldError {
    #[error("Suffix list unavailable at {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid suffix list: {0}")]
    InvalidSuffixList(String),

    #[error("Download error: {message}")]
    DownloadFailed {
        kind: DownloadErrorKind,
        message: String,
    },

    #[error("Update only applies to the managed suffix list, not {0}")]
    NotManaged(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TldError>;
