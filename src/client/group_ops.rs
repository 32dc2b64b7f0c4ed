use crate::{NntpClient, Result, codes, commands, error::NntpError};
use tracing::debug;

impl NntpClient {
    /// Select a newsgroup
    ///
    /// Returns [`GroupInfo`](crate::commands::GroupInfo) with article count, range
    /// and the server's name for the group.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchGroup`] - The newsgroup does not exist
    /// - [`NntpError::Protocol`] - Server returned an unexpected error
    /// - [`NntpError::InvalidResponse`] - Could not parse the server response
    pub async fn select_group(&mut self, newsgroup: &str) -> Result<commands::GroupInfo> {
        debug!("Selecting newsgroup: {}", newsgroup);

        let cmd = commands::group(newsgroup);
        self.send_command(&cmd).await?;
        let response = self.read_response().await?;

        if response.code == codes::NO_SUCH_GROUP {
            self.current_group = None;
            return Err(NntpError::NoSuchGroup(newsgroup.to_string()));
        }

        let info = commands::parse_group_response(response, newsgroup)?;
        self.current_group = Some(info.name.clone());

        debug!(
            "Group {} selected: {} articles ({}-{})",
            info.name, info.count, info.first, info.last
        );
        Ok(info)
    }
}
