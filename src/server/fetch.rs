//! Bulk body retrieval

use super::Server;
use crate::commands::bracket_message_id;
use crate::session::{Connector, Session};
use crate::yenc;
use tracing::{debug, warn};

impl<C: Connector> Server<C> {
    /// Fetch and yEnc-decode the bodies of `message_ids`, concatenated in order
    ///
    /// All or nothing: any fetch or decode failure returns `None`, as does an
    /// empty id list. Ids may be given with or without angle brackets.
    pub async fn get<S: AsRef<str>>(&mut self, group: &str, message_ids: &[S]) -> Option<Vec<u8>> {
        if message_ids.is_empty() {
            return None;
        }

        self.connect().await;
        let delay = self.config.retry_delay;
        self.select(group, delay).await.ok()?;

        let mut data = Vec::new();
        for id in message_ids {
            let article = bracket_message_id(id.as_ref());
            let body = self
                .guarded(Some(group), delay, async |session: &mut C::Session| {
                    session.body(&article).await
                })
                .await
                .ok()?;

            match yenc::decode(&body) {
                Ok(decoded) => {
                    debug!("Decoded {} bytes from {}", decoded.data.len(), article);
                    data.extend_from_slice(&decoded.data);
                }
                Err(e) => {
                    warn!("Could not decode {}: {}", article, e);
                    return None;
                }
            }
        }

        Some(data)
    }
}
