//! XOVER command and overview record parsing

use crate::error::{NntpError, Result};

/// Build XOVER command for an inclusive article range
pub fn xover(first: u64, last: u64) -> String {
    format!("XOVER {}-{}\r\n", first, last)
}

/// One overview line: the header summary of a single article
///
/// Fields other than the article number are kept as delivered so that the
/// part assembler decides what counts as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewRecord {
    /// Article number within the newsgroup
    pub article_number: u64,
    /// Subject header; `None` when absent or empty
    pub subject: Option<String>,
    /// From header
    pub from: String,
    /// Date header, unparsed
    pub date: String,
    /// Message-ID including angle brackets
    pub message_id: String,
    /// References header
    pub references: String,
    /// `:bytes` metadata, unparsed
    pub bytes: String,
    /// `:lines` metadata, unparsed
    pub lines: String,
    /// Xref header value without the `Xref:` prefix (empty if not sent)
    pub xref: String,
}

/// Parse an XOVER response line
///
/// Format: "number\tsubject\tfrom\tdate\tmessage-id\treferences\tbytes\tlines[\txref]"
///
/// Only the article number is mandatory; short lines leave the trailing
/// fields empty.
pub fn parse_over_line(line: &str) -> Result<OverviewRecord> {
    let mut fields = line.split('\t');

    let article_number = fields
        .next()
        .and_then(|n| n.trim().parse::<u64>().ok())
        .ok_or_else(|| NntpError::InvalidResponse(line.chars().take(100).collect()))?;

    let mut next = || fields.next().unwrap_or("").to_string();
    let subject = Some(next()).filter(|s| !s.trim().is_empty());
    let from = next();
    let date = next();
    let message_id = next();
    let references = next();
    let bytes = next();
    let lines = next();
    let xref = strip_xref_prefix(&next()).to_string();

    Ok(OverviewRecord {
        article_number,
        subject,
        from,
        date,
        message_id,
        references,
        bytes,
        lines,
        xref,
    })
}

/// Remove a case-insensitive "Xref:" prefix from a full-header overview field
fn strip_xref_prefix(field: &str) -> &str {
    let trimmed = field.trim_start();
    match trimmed.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("xref:") => trimmed[5..].trim_start(),
        _ => trimmed,
    }
}
