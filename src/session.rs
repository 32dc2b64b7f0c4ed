//! Transport seam between the scanning engine and the wire client
//!
//! The engine only needs a handful of protocol primitives. A [`Connector`]
//! opens a [`Session`] that provides them; [`NntpConnector`] does so over a
//! real [`NntpClient`] connection.

use crate::client::NntpClient;
use crate::commands::{GroupInfo, OverviewRecord};
use crate::config::ServerConfig;
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// One open, exclusively owned protocol connection
pub trait Session: Send {
    /// Select a group and return its metadata
    fn select_group(&mut self, group: &str) -> impl Future<Output = Result<GroupInfo>> + Send;

    /// Overview records for the inclusive range `first..=last`
    fn overview(
        &mut self,
        first: u64,
        last: u64,
    ) -> impl Future<Output = Result<Vec<OverviewRecord>>> + Send;

    /// Header lines of an article in the selected group
    fn head(&mut self, article: u64) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Raw body of an article by message-id (with angle brackets)
    fn body(&mut self, message_id: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Say goodbye; the session is not used afterwards
    fn quit(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Whether the stream is desynchronised and must be replaced
    fn is_broken(&self) -> bool {
        false
    }
}

/// Factory for sessions
pub trait Connector: Send + Sync {
    type Session: Session;

    /// Open, authenticate and configure a new session
    fn connect(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Opens [`NntpClient`] sessions for a server configuration
#[derive(Debug, Clone)]
pub struct NntpConnector {
    config: Arc<ServerConfig>,
}

impl NntpConnector {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl Connector for NntpConnector {
    type Session = NntpClient;

    async fn connect(&self) -> Result<NntpClient> {
        let mut client = NntpClient::connect(Arc::clone(&self.config)).await?;

        if self.config.has_credentials() {
            client.authenticate().await?;
        }

        if self.config.compression {
            let enabled = client.try_enable_compression().await?;
            debug!("Compression for {}: {}", self.config.host, enabled);
        }

        Ok(client)
    }
}

impl Session for NntpClient {
    async fn select_group(&mut self, group: &str) -> Result<GroupInfo> {
        NntpClient::select_group(self, group).await
    }

    async fn overview(&mut self, first: u64, last: u64) -> Result<Vec<OverviewRecord>> {
        self.fetch_xover(first, last).await
    }

    async fn head(&mut self, article: u64) -> Result<Vec<String>> {
        Ok(self.fetch_head(&article.to_string()).await?.lines)
    }

    async fn body(&mut self, message_id: &str) -> Result<Vec<u8>> {
        self.fetch_body(message_id).await
    }

    async fn quit(&mut self) -> Result<()> {
        NntpClient::quit(self).await
    }

    fn is_broken(&self) -> bool {
        NntpClient::is_broken(self)
    }
}
