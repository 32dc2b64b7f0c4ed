//! Connection state types for NNTP client

/// Authentication progress of a connection (RFC 4643)
pub(super) enum ConnectionState {
    /// Connected and ready for commands (not authenticated)
    Ready,
    /// AUTHINFO USER sent, waiting for the PASS exchange to finish
    InProgress,
    /// Successfully authenticated
    Authenticated,
    /// QUIT sent
    Closed,
}

/// Compression mode for NNTP connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CompressionMode {
    /// No compression
    None,
    /// XFEATURE COMPRESS GZIP: only multiline responses tagged
    /// `[COMPRESS=GZIP]` carry a zlib body
    HeadersOnly,
}
