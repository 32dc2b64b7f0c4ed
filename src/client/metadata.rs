//! Overview retrieval (XOVER)

use crate::commands::{self, OverviewRecord};
use crate::error::{NntpError, Result};
use crate::response::codes;
use tracing::{trace, warn};

use super::NntpClient;

impl NntpClient {
    /// Fetch overview records for an inclusive article range
    ///
    /// Lines whose article number does not parse are logged and skipped. An
    /// empty range (no articles in it) comes back as an empty list, whether
    /// the server answers 224 with no lines or 420/423.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoGroupSelected`] - No group is selected on this connection
    /// - [`NntpError::Protocol`] - Server returned another error
    /// - [`NntpError::Timeout`] - Server did not respond in time
    pub async fn fetch_xover(&mut self, first: u64, last: u64) -> Result<Vec<OverviewRecord>> {
        trace!("Fetching XOVER: {}-{}", first, last);

        let cmd = commands::xover(first, last);
        self.send_command(&cmd).await?;
        let response = self.read_multiline_response().await?;

        match response.code {
            codes::OVERVIEW_INFO_FOLLOWS => {}
            codes::NO_CURRENT_ARTICLE | codes::NO_SUCH_ARTICLE_NUMBER => return Ok(Vec::new()),
            codes::NO_GROUP_SELECTED => return Err(NntpError::NoGroupSelected),
            code => {
                return Err(NntpError::Protocol {
                    code,
                    message: response.message,
                });
            }
        }

        let mut records = Vec::with_capacity(response.lines.len());
        for line in &response.lines {
            match commands::parse_over_line(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Failed to parse XOVER line: {} - {}", line, e),
            }
        }

        Ok(records)
    }
}
