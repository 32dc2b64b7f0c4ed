//! Scoped recovery around single protocol calls
//!
//! A failed call is classified by [`NntpError::kind`]. Transient failures
//! pause, rebuild the connection and reselect the active group; protocol
//! failures are passed through untouched unless the stream is out of sync.
//! The original error is always returned to the caller, which decides
//! whether to try again.

use super::Server;
use crate::commands::GroupInfo;
use crate::error::{FailureKind, NntpError, Result};
use crate::session::{Connector, Session};
use std::time::Duration;
use tracing::{debug, error, warn};

impl<C: Connector> Server<C> {
    /// Run one protocol call against the open session
    ///
    /// On failure the connection is made healthy again (per the error's
    /// [`FailureKind`]) before the error is returned. `group` is reselected
    /// after a reconnect; `delay` is the pause before reconnecting.
    pub async fn guarded<T>(
        &mut self,
        group: Option<&str>,
        delay: Duration,
        op: impl AsyncFnOnce(&mut C::Session) -> Result<T>,
    ) -> Result<T> {
        let result = match self.session.as_mut() {
            Some(session) => op(session).await,
            None => Err(NntpError::NotConnected),
        };

        if let Err(e) = &result {
            self.recover(e, group, delay).await;
        }
        result
    }

    async fn recover(&mut self, failure: &NntpError, group: Option<&str>, delay: Duration) {
        match failure.kind() {
            FailureKind::Transient => {
                warn!(
                    "Local connection error ({}), reconnecting in {:?}",
                    failure, delay
                );
                tokio::time::sleep(delay).await;
                self.restore(group).await;
            }
            FailureKind::Protocol => {
                warn!("NNTP error: {}", failure);
                if self.session.as_ref().is_some_and(Session::is_broken) {
                    warn!("Connection out of sync after bad response, reconnecting");
                    self.restore(group).await;
                }
            }
            FailureKind::Fatal => error!("Unrecoverable error: {}", failure),
        }
    }

    /// Reconnect and reselect `group`; failures are logged, not raised
    async fn restore(&mut self, group: Option<&str>) {
        if !self.reconnect().await {
            return;
        }

        let (Some(group), Some(session)) = (group, self.session.as_mut()) else {
            return;
        };
        match session.select_group(group).await {
            Ok(_) => {
                debug!("Reselected {} after reconnect", group);
                self.current_group = Some(group.to_string());
            }
            Err(e) => warn!("Could not reselect {} after reconnect: {}", group, e),
        }
    }

    /// Select `name` inside the recovery scope
    pub(super) async fn select(&mut self, name: &str, delay: Duration) -> Result<GroupInfo> {
        let result = self
            .guarded(None, delay, async |session: &mut C::Session| {
                session.select_group(name).await
            })
            .await;

        self.current_group = result.as_ref().ok().map(|_| name.to_string());
        result
    }

    /// Select `name` unless the session already has it selected
    pub(super) async fn ensure_group(&mut self, name: &str, delay: Duration) -> Result<()> {
        if self.session.is_some() && self.current_group.as_deref() == Some(name) {
            return Ok(());
        }
        self.select(name, delay).await.map(|_| ())
    }
}
