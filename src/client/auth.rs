//! AUTHINFO USER/PASS login (RFC 4643 section 2.3)

use super::NntpClient;
use super::state::ConnectionState;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::codes;
use tracing::debug;

impl NntpClient {
    /// Log in with the configured username and password
    ///
    /// Some servers accept the username alone and answer 281 to USER; PASS
    /// is then skipped. Calling this twice on one connection is a 502.
    ///
    /// # Errors
    ///
    /// [`NntpError::AuthFailed`] carries the server's rejection text. I/O
    /// failures surface as [`NntpError::ConnectionClosed`] or
    /// [`NntpError::Timeout`].
    pub async fn authenticate(&mut self) -> Result<()> {
        if self.is_authenticated() {
            return Err(NntpError::Protocol {
                code: 502,
                message: "Already authenticated".to_string(),
            });
        }
        debug!("AUTHINFO USER {} on {}", self.config.username, self.config.host);

        self.state = ConnectionState::InProgress;
        self.send_command(&commands::authinfo_user(&self.config.username))
            .await?;
        let after_user = self.read_response().await?;

        let verdict = match after_user.code {
            codes::AUTH_CONTINUE => {
                self.send_command(&commands::authinfo_pass(&self.config.password))
                    .await?;
                self.read_response().await?
            }
            _ => after_user,
        };

        if verdict.code == codes::AUTH_ACCEPTED {
            self.state = ConnectionState::Authenticated;
            debug!("Logged in to {}", self.config.host);
            Ok(())
        } else {
            self.state = ConnectionState::Ready;
            Err(NntpError::AuthFailed(verdict.message))
        }
    }
}
