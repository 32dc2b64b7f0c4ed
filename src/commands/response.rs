//! Status line parsing

use crate::error::{NntpError, Result};
use crate::response::NntpResponse;

fn invalid(line: &str) -> NntpError {
    NntpError::InvalidResponse(line.chars().take(100).collect())
}

/// Split a status line into its 3-digit code and message
///
/// Tolerates a leading UTF-8 BOM and a missing space after the code, but
/// rejects codes longer than three digits ("2000 ok" is not "200").
pub fn parse_response_line(line: &str) -> Result<(u16, String)> {
    let line = line.trim_start_matches('\u{FEFF}');
    let bytes = line.as_bytes();

    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(invalid(line));
    }
    if bytes.get(3).is_some_and(u8::is_ascii_digit) {
        return Err(invalid(line));
    }

    let code = line[..3].parse::<u16>().map_err(|_| invalid(line))?;
    let rest = &line[3..];
    let message = rest.strip_prefix(' ').unwrap_or(rest).to_string();

    Ok((code, message))
}

/// Parse a single-line NNTP response
pub fn parse_single_response(line: &str) -> Result<NntpResponse> {
    let (code, message) = parse_response_line(line)?;

    Ok(NntpResponse {
        code,
        message,
        lines: vec![],
    })
}
