//! Error types for LanCopy
//!
//! Every failure a transfer session can hit is described here. Library code
//! only returns these; the binary decides the exit status.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for LanCopy operations
#[derive(Error, Debug)]
pub enum LanCopyError {
    /// Missing or invalid command-line arguments
    #[error("{0}")]
    Usage(String),

    /// File to send does not exist
    #[error("File does not exist: {0}")]
    NotFound(PathBuf),

    /// I/O error on a local file
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Host name could not be resolved to a socket address
    #[error("Could not resolve address: {0}")]
    AddressResolution(String),

    /// Outbound connection failed (refused, unreachable, timed out)
    #[error("Failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Could not bind the listening socket
    #[error("Failed to listen on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Accepting the inbound connection failed
    #[error("Failed to accept connection: {source}")]
    Accept {
        #[source]
        source: io::Error,
    },

    /// Nobody connected within the accept window
    #[error("No connection received within {0} seconds")]
    AcceptTimeout(u64),

    /// Streaming bytes over the connection failed
    #[error("Transfer failed: {source}")]
    Transfer {
        #[source]
        source: io::Error,
    },

    /// Session summary could not be encoded
    #[error("Failed to encode summary: {0}")]
    Output(#[from] serde_json::Error),
}

impl LanCopyError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a connection error
    pub fn connection(addr: impl Into<String>, source: io::Error) -> Self {
        Self::Connection {
            addr: addr.into(),
            source,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Check if this is a missing/invalid argument error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Check if this error was caused by a timeout or an expired deadline
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::AcceptTimeout(_) => true,
            Self::Connection { source, .. } | Self::Transfer { source } | Self::Accept { source } => {
                matches!(source.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
            }
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for LanCopy operations
pub type Result<T> = std::result::Result<T, LanCopyError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| LanCopyError::io(path, e))
    }
}
