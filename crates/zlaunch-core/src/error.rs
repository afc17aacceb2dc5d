//! Error type shared by the launcher components.
//!
//! Every component failure maps onto one of four kinds. The launcher wraps
//! them with the stage that failed before they reach the CLI.

use std::fmt;
use std::io;
use std::path::Path;

/// Broad classification of a [`LaunchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or non-success HTTP status.
    Network,
    /// Response body was not the expected structured data.
    Parse,
    /// The release feed returned no releases.
    NotFound,
    /// Filesystem create/read/write was denied or failed.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Network => "network failure",
            ErrorKind::Parse => "parse failure",
            ErrorKind::NotFound => "not found",
            ErrorKind::Io => "I/O failure",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Curl reported an error (connection refused, DNS, TLS, aborted transfer).
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: curl::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    HttpStatus { url: String, code: u32 },
    #[error("failed to parse release list from {url}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no releases found at {url}")]
    NotFound { url: String },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LaunchError::Transport { .. } | LaunchError::HttpStatus { .. } => ErrorKind::Network,
            LaunchError::Parse { .. } => ErrorKind::Parse,
            LaunchError::NotFound { .. } => ErrorKind::NotFound,
            LaunchError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn transport(context: impl Into<String>, source: curl::Error) -> Self {
        LaunchError::Transport {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io(action: &str, path: &Path, source: io::Error) -> Self {
        LaunchError::Io {
            context: format!("failed to {} {}", action, path.display()),
            source,
        }
    }
}
