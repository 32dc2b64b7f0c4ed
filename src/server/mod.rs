//! The scanning engine: one connection, one operation at a time
//!
//! A [`Server`] owns a single session opened by its [`Connector`]. Every
//! protocol call runs inside the recovery scope in [`recovery`], which
//! rebuilds the connection after transient failures before handing the
//! error back. Retry policy stays with the operation.
//!
//! # Example
//!
//! ```no_run
//! use nntp_scanner::{ScanTarget, Server, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = Server::new(ServerConfig::tls("news.example.com", "user", "pass"));
//!
//! if let Some(start) = server.day_to_post("alt.binaries.test", 30).await {
//!     let result = server
//!         .scan("alt.binaries.test", ScanTarget::Range { first: start, last: start + 20_000 })
//!         .await?;
//!     println!("{} parts, {} missed", result.parts.len(), result.missed.len());
//! }
//!
//! server.quit().await;
//! # Ok(())
//! # }
//! ```

mod fetch;
mod locator;
mod recovery;
mod scan;

pub use locator::{FractionNudge, RandomNudge, days_old, tolerance_for_days};
pub use scan::{ScanResult, ScanStats, ScanTarget};

use crate::blacklist::{BlacklistSource, StaticBlacklist};
use crate::commands::GroupInfo;
use crate::config::{EngineConfig, ServerConfig};
use crate::session::{Connector, NntpConnector, Session};
use std::sync::Arc;
use tracing::{debug, error};

/// Resilient scanner over one exclusively owned connection
pub struct Server<C: Connector> {
    connector: C,
    session: Option<C::Session>,
    /// Group the live session has selected
    current_group: Option<String>,
    blacklist: Arc<dyn BlacklistSource + Send + Sync>,
    config: EngineConfig,
    nudge: Box<dyn FractionNudge + Send>,
}

impl Server<NntpConnector> {
    /// Scanner for a real NNTP server with default engine settings
    pub fn new(config: ServerConfig) -> Self {
        Self::with_connector(NntpConnector::new(config))
    }
}

impl<C: Connector> Server<C> {
    /// Scanner over any transport, with an empty blacklist
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            session: None,
            current_group: None,
            blacklist: Arc::new(StaticBlacklist::empty()),
            config: EngineConfig::default(),
            nudge: Box::new(RandomNudge),
        }
    }

    /// Use a shared blacklist rule source
    #[must_use]
    pub fn with_blacklist(mut self, blacklist: Arc<dyn BlacklistSource + Send + Sync>) -> Self {
        self.blacklist = blacklist;
        self
    }

    #[must_use]
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the locator's fraction perturbation
    #[must_use]
    pub fn with_nudge(mut self, nudge: impl FractionNudge + Send + 'static) -> Self {
        self.nudge = Box::new(nudge);
        self
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session unless one is already open
    ///
    /// Returns `false` (and logs) if the connection could not be made.
    pub async fn connect(&mut self) -> bool {
        if self.session.is_some() {
            return true;
        }

        match self.connector.connect().await {
            Ok(session) => {
                debug!("Connected to news server");
                self.session = Some(session);
                true
            }
            Err(e) => {
                error!("Could not connect to news server: {}", e);
                false
            }
        }
    }

    /// Drop the current session and open a fresh one
    pub async fn reconnect(&mut self) -> bool {
        self.quit().await;
        self.connect().await
    }

    /// Close the session if one is open
    ///
    /// Errors while saying goodbye are logged and swallowed; the connection
    /// state is always cleared.
    pub async fn quit(&mut self) {
        self.current_group = None;
        if let Some(mut session) = self.session.take()
            && let Err(e) = session.quit().await
        {
            debug!("Error while closing connection: {}", e);
        }
    }

    /// Select a group, returning its metadata or `None` on any failure
    pub async fn group(&mut self, name: &str) -> Option<GroupInfo> {
        self.connect().await;
        let delay = self.config.retry_delay;
        self.select(name, delay).await.ok()
    }
}
