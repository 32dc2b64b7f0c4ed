//! Single NNTP connection: login, compression, group and article commands

mod articles;
mod auth;
mod compression;
mod connection;
mod group_ops;
mod io;
mod metadata;
mod state;

use crate::config::ServerConfig;
use state::{CompressionMode, ConnectionState};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::debug;

/// Byte stream the client talks over: plain TCP or TLS over TCP
pub(crate) trait NntpStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> NntpStream for T {}

/// One connection to a news server
///
/// The scanner engine drives it through [`crate::Session`]; it can also be
/// used on its own.
///
/// # Example
///
/// ```no_run
/// use nntp_scanner::{NntpClient, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
/// let mut client = NntpClient::connect(Arc::new(config)).await?;
/// client.authenticate().await?;
/// client.try_enable_compression().await?;
///
/// let info = client.select_group("alt.binaries.test").await?;
/// let records = client.fetch_xover(info.last.saturating_sub(99), info.last).await?;
/// println!("{} of {} articles", records.len(), info.count);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct NntpClient {
    stream: BufReader<Box<dyn NntpStream>>,
    state: ConnectionState,
    config: Arc<ServerConfig>,
    current_group: Option<String>,
    compression_mode: CompressionMode,
    /// Wire bytes of compressed blocks
    bytes_compressed: u64,
    /// Same blocks after inflating
    bytes_decompressed: u64,
    /// Set once the stream carried something unparseable
    is_broken: bool,
}

impl NntpClient {
    /// A broken connection is out of sync with the server and must be replaced
    pub fn is_broken(&self) -> bool {
        self.is_broken
    }

    fn mark_broken(&mut self) {
        self.is_broken = true;
    }

    /// Group chosen by the last successful GROUP
    pub fn current_group(&self) -> Option<&str> {
        self.current_group.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, ConnectionState::Authenticated)
    }
}

impl Drop for NntpClient {
    fn drop(&mut self) {
        debug!("Closing connection to {}:{}", self.config.host, self.config.port);
    }
}
