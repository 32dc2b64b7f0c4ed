//! GROUP command and group metadata parsing

use crate::error::{NntpError, Result};
use crate::response::NntpResponse;

/// Build GROUP command
pub fn group(newsgroup: &str) -> String {
    format!("GROUP {}\r\n", newsgroup)
}

/// Group information returned by the GROUP command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    /// Estimated number of articles in the group
    pub count: u64,
    /// Number of the first article
    pub first: u64,
    /// Number of the last article
    pub last: u64,
    /// Group name as reported by the server
    pub name: String,
}

/// Parse GROUP response to extract article count, range and canonical name
///
/// Response format: "211 count first last group-name"
///
/// `requested` is used as the name when the server omits it.
pub fn parse_group_response(response: NntpResponse, requested: &str) -> Result<GroupInfo> {
    if !response.is_success() {
        return Err(NntpError::Protocol {
            code: response.code,
            message: response.message,
        });
    }

    let parts: Vec<&str> = response.message.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(NntpError::InvalidResponse(response.message));
    }

    let number = |field: &str| {
        field
            .parse::<u64>()
            .map_err(|_| NntpError::InvalidResponse(response.message.clone()))
    };
    let count = number(parts[0])?;
    let first = number(parts[1])?;
    let last = number(parts[2])?;
    let name = parts.get(3).copied().unwrap_or(requested).to_string();

    Ok(GroupInfo {
        count,
        first,
        last,
        name,
    })
}
