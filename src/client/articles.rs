//! Article retrieval (HEAD, BODY) and session shutdown

use crate::response::NntpResponse;
use crate::{NntpError, Result, commands, response::codes};
use tracing::{debug, trace};

use super::NntpClient;
use super::state::ConnectionState;

/// Map a failed article status to the matching error
fn article_error(id: &str, code: u16, message: String) -> NntpError {
    match code {
        codes::NO_SUCH_ARTICLE_ID | codes::NO_SUCH_ARTICLE_NUMBER | codes::NO_CURRENT_ARTICLE => {
            NntpError::NoSuchArticle(id.to_string())
        }
        codes::NO_GROUP_SELECTED => NntpError::NoGroupSelected,
        _ => NntpError::Protocol { code, message },
    }
}

impl NntpClient {
    /// Fetch article headers by number or message-id
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchArticle`] - The article does not exist
    /// - [`NntpError::NoGroupSelected`] - A number was given with no group selected
    /// - [`NntpError::Protocol`] - Server returned an unexpected error
    /// - [`NntpError::Timeout`] - Server did not respond in time
    pub async fn fetch_head(&mut self, id: &str) -> Result<NntpResponse> {
        trace!("Fetching head: {}", id);

        let cmd = commands::head(id);
        self.send_command(&cmd).await?;
        let response = self.read_multiline_response().await?;

        if response.code != codes::HEAD_FOLLOWS {
            return Err(article_error(id, response.code, response.message));
        }

        Ok(response)
    }

    /// Fetch an article body as raw bytes, one `\n` per line
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchArticle`] - The article does not exist
    /// - [`NntpError::Protocol`] - Server returned an unexpected error
    /// - [`NntpError::Timeout`] - Server did not respond in time
    pub async fn fetch_body(&mut self, id: &str) -> Result<Vec<u8>> {
        trace!("Fetching body: {}", id);

        let cmd = commands::body(id);
        self.send_command(&cmd).await?;
        let response = self.read_multiline_response_binary().await?;

        if response.code != codes::BODY_FOLLOWS {
            return Err(article_error(id, response.code, response.message));
        }

        Ok(response.data)
    }

    /// Send QUIT and mark the connection closed
    ///
    /// The server's goodbye is read but not required; a connection that drops
    /// before answering is still closed.
    pub async fn quit(&mut self) -> Result<()> {
        debug!("Sending QUIT to {}", self.config.host);
        self.send_command(commands::quit()).await?;
        self.state = ConnectionState::Closed;

        match self.read_response().await {
            Ok(response) if response.code != codes::CLOSING_CONNECTION => {
                debug!("Unexpected QUIT response: {} {}", response.code, response.message);
            }
            Ok(_) | Err(NntpError::ConnectionClosed) => {}
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
