//! NNTP error types

use thiserror::Error;

/// NNTP protocol, connection and scanning errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during secure connection
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection or read timeout
    #[error("Connection timeout")]
    Timeout,

    /// Invalid or malformed data from the server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// NNTP protocol error with response code
    #[error("NNTP error {code}: {message}")]
    Protocol {
        /// NNTP response code (e.g., 411, 430, 502)
        code: u16,
        /// Error message from server
        message: String,
    },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// No such newsgroup
    #[error("No such newsgroup: {0}")]
    NoSuchGroup(String),

    /// No such article
    #[error("No such article: {0}")]
    NoSuchArticle(String),

    /// No newsgroup selected
    #[error("No newsgroup selected")]
    NoGroupSelected,

    /// Connection closed unexpectedly
    #[error("Connection closed")]
    ConnectionClosed,

    /// No connection is open
    #[error("Not connected")]
    NotConnected,

    /// A blacklist pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// How a failed protocol call should be treated by the recovery scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Local I/O trouble: the connection is rebuilt before the error is re-raised
    Transient,
    /// The server rejected the command or sent something unparseable
    Protocol,
    /// Anything else (credentials, TLS, invalid configuration)
    Fatal,
}

impl NntpError {
    /// Classify this error for connection recovery
    pub fn kind(&self) -> FailureKind {
        match self {
            NntpError::Io(_)
            | NntpError::Timeout
            | NntpError::ConnectionClosed
            | NntpError::NotConnected => FailureKind::Transient,
            NntpError::InvalidResponse(_)
            | NntpError::Protocol { .. }
            | NntpError::NoSuchGroup(_)
            | NntpError::NoSuchArticle(_)
            | NntpError::NoGroupSelected => FailureKind::Protocol,
            NntpError::Tls(_)
            | NntpError::AuthFailed(_)
            | NntpError::InvalidPattern(_)
            | NntpError::Other(_) => FailureKind::Fatal,
        }
    }

    /// Returns true if reconnecting could make the next call succeed
    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;
