//! Low-level I/O operations for NNTP protocol communication
//!
//! Command transmission, status line parsing, multi-line reads (text and
//! binary) and detection of `[COMPRESS=GZIP]` blocks. Every read is bounded
//! by a timeout, and garbage from the server marks the connection broken.

use super::{CompressionMode, NntpClient};
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::{NntpBinaryResponse, NntpResponse};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::trace;

const SINGLE_LINE_TIMEOUT: Duration = Duration::from_secs(60);
const MULTILINE_TIMEOUT: Duration = Duration::from_secs(180);
const COMPRESSED_READ_BUFFER_SIZE: usize = 256 * 1024;
const BINARY_DATA_INITIAL_CAPACITY: usize = 512 * 1024;
/// Maximum size for a compressed block to prevent OOM from broken servers (64 MB)
const MAX_COMPRESSED_BLOCK_SIZE: usize = 64 * 1024 * 1024;
/// Status line marker for a zlib-compressed multi-line body
const COMPRESSED_MARKER: &str = "[COMPRESS=GZIP]";

/// Strip NNTP byte-stuffing from a line (leading ".." becomes ".").
fn strip_byte_stuffing(line: &str) -> &str {
    if line.starts_with("..") {
        &line[1..]
    } else {
        line
    }
}

/// Strip the trailing CRLF or LF from a raw line
fn strip_line_ending(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .unwrap_or(line)
}

/// Split decompressed overview text into unstuffed lines
fn split_lines(data: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(data);
    let mut lines = Vec::with_capacity((data.len() / 80).max(16));
    for line in text.lines() {
        if line == "." {
            break;
        }
        lines.push(strip_byte_stuffing(line).to_string());
    }
    lines
}

/// Append one unstuffed body line plus `\n` to `data`
fn push_body_line(data: &mut Vec<u8>, line: &[u8]) {
    let line = if line.starts_with(b"..") { &line[1..] } else { line };
    data.extend_from_slice(line);
    data.push(b'\n');
}

/// Unstuff a decompressed binary block, byte for byte, up to the terminator
fn split_body_lines(block: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(block.len());
    for line in block.split_inclusive(|&b| b == b'\n') {
        let content = strip_line_ending(line);
        if content == b"." {
            break;
        }
        push_body_line(&mut data, content);
    }
    data
}

impl NntpClient {
    /// Send a command to the server
    pub(super) async fn send_command(&mut self, command: &str) -> Result<()> {
        // Never log the password
        if command.starts_with("AUTHINFO PASS") {
            trace!("Sending command: AUTHINFO PASS ****");
        } else {
            trace!("Sending command: {}", command.trim());
        }
        self.stream.get_mut().write_all(command.as_bytes()).await?;
        self.stream.get_mut().flush().await?;
        Ok(())
    }

    /// Read one raw line including its terminator
    async fn read_raw_line(&mut self, capacity: usize) -> Result<Vec<u8>> {
        let mut line_bytes = Vec::with_capacity(capacity);
        self.stream.read_until(b'\n', &mut line_bytes).await?;

        if line_bytes.is_empty() {
            return Err(NntpError::ConnectionClosed);
        }
        Ok(line_bytes)
    }

    /// Read and parse a status line
    async fn read_status_line(&mut self) -> Result<(u16, String)> {
        let line_bytes = self.read_raw_line(256).await?;
        let line = String::from_utf8_lossy(&line_bytes);
        let line = line.trim_end();
        trace!("Received: {}", line);

        commands::parse_response_line(line)
    }

    /// Whether a status message announces a compressed body on this connection
    fn is_compressed_response(&self, message: &str) -> bool {
        self.compression_mode == CompressionMode::HeadersOnly && message.contains(COMPRESSED_MARKER)
    }

    /// Mark the connection broken when the server sent garbage
    fn note_garbage<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(NntpError::InvalidResponse(_)) = &result {
            self.mark_broken();
        }
        result
    }

    /// Read a single-line response
    pub(super) async fn read_response(&mut self) -> Result<NntpResponse> {
        let result = timeout(SINGLE_LINE_TIMEOUT, self.read_status_line())
            .await
            .map_err(|_| NntpError::Timeout)?;
        let (code, message) = self.note_garbage(result)?;

        Ok(NntpResponse {
            code,
            message,
            lines: vec![],
        })
    }

    /// Read a multi-line text response (ending with ".\r\n")
    ///
    /// Error statuses (>= 400) carry no body and come back with no lines.
    pub(super) async fn read_multiline_response(&mut self) -> Result<NntpResponse> {
        let result = timeout(MULTILINE_TIMEOUT, self.read_multiline_text())
            .await
            .map_err(|_| NntpError::Timeout)?;
        self.note_garbage(result)
    }

    async fn read_multiline_text(&mut self) -> Result<NntpResponse> {
        let (code, message) = self.read_status_line().await?;
        if code >= 400 {
            return Ok(NntpResponse {
                code,
                message,
                lines: vec![],
            });
        }

        if self.is_compressed_response(&message) {
            let block = self.read_compressed_block().await?;
            trace!("Read {} compressed bytes", block.len());
            let decompressed = self.maybe_decompress(&block)?;
            trace!("Decompressed to {} bytes", decompressed.len());

            return Ok(NntpResponse {
                code,
                message,
                lines: split_lines(&decompressed),
            });
        }

        let mut lines = Vec::with_capacity(64);
        loop {
            let line_bytes = self.read_raw_line(512).await?;
            let line = String::from_utf8_lossy(strip_line_ending(&line_bytes));
            if line == "." {
                break;
            }
            lines.push(strip_byte_stuffing(&line).to_string());
        }

        Ok(NntpResponse {
            code,
            message,
            lines,
        })
    }

    /// Read compressed data as binary until the uncompressed terminator (".\r\n" or ".\n")
    async fn read_compressed_block(&mut self) -> Result<Vec<u8>> {
        let mut all_data = Vec::new();
        let mut buffer = vec![0u8; COMPRESSED_READ_BUFFER_SIZE];

        loop {
            let n = self.stream.read(&mut buffer).await?;
            if n == 0 {
                return Err(NntpError::ConnectionClosed);
            }

            all_data.extend_from_slice(&buffer[..n]);

            if all_data.len() > MAX_COMPRESSED_BLOCK_SIZE {
                return Err(NntpError::InvalidResponse(format!(
                    "Compressed block exceeds maximum size of {} bytes",
                    MAX_COMPRESSED_BLOCK_SIZE
                )));
            }

            if all_data.ends_with(b".\r\n") {
                all_data.truncate(all_data.len() - 3);
                break;
            } else if all_data.ends_with(b".\n") {
                all_data.truncate(all_data.len() - 2);
                break;
            }
        }

        Ok(all_data)
    }

    /// Read a multi-line response as raw bytes
    ///
    /// Each body line keeps a trailing `\n` so line-oriented decoders (yEnc)
    /// see the original line structure; CR is dropped.
    pub(super) async fn read_multiline_response_binary(&mut self) -> Result<NntpBinaryResponse> {
        let result = timeout(MULTILINE_TIMEOUT, self.read_multiline_bytes())
            .await
            .map_err(|_| NntpError::Timeout)?;
        self.note_garbage(result)
    }

    async fn read_multiline_bytes(&mut self) -> Result<NntpBinaryResponse> {
        let (code, message) = self.read_status_line().await?;
        if code >= 400 {
            return Ok(NntpBinaryResponse {
                code,
                message,
                data: vec![],
            });
        }

        if self.is_compressed_response(&message) {
            let block = self.read_compressed_block().await?;
            let decompressed = self.maybe_decompress(&block)?;
            return Ok(NntpBinaryResponse {
                code,
                message,
                data: split_body_lines(&decompressed),
            });
        }

        let mut data = Vec::with_capacity(BINARY_DATA_INITIAL_CAPACITY);
        loop {
            let line_bytes = self.read_raw_line(512).await?;
            let content = strip_line_ending(&line_bytes);
            if content == b"." {
                break;
            }
            push_body_line(&mut data, content);
        }

        Ok(NntpBinaryResponse {
            code,
            message,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_values() {
        assert_eq!(SINGLE_LINE_TIMEOUT, Duration::from_secs(60));
        assert_eq!(MULTILINE_TIMEOUT, Duration::from_secs(180));
        assert!(MULTILINE_TIMEOUT > SINGLE_LINE_TIMEOUT);
    }

    #[test]
    fn test_dot_stuffing_removal() {
        assert_eq!(strip_byte_stuffing("Hello world"), "Hello world");
        assert_eq!(strip_byte_stuffing("..leading dot"), ".leading dot");
        assert_eq!(strip_byte_stuffing("."), ".");
        assert_eq!(strip_byte_stuffing("..."), "..");
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending(b"data\r\n"), b"data");
        assert_eq!(strip_line_ending(b"data\n"), b"data");
        assert_eq!(strip_line_ending(b"data"), b"data");
        assert_eq!(strip_line_ending(b"\r\n"), b"");
    }

    #[test]
    fn test_split_lines_unstuffs_and_stops_at_terminator() {
        let lines = split_lines(b"1\tsubject\r\n..dotted\r\n.\r\nignored\r\n");
        assert_eq!(lines, vec!["1\tsubject", ".dotted"]);
    }

    #[test]
    fn test_split_lines_invalid_utf8_is_lossy() {
        let lines = split_lines(b"Hello \xFF world\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains('\u{FFFD}'));
    }

    #[test]
    fn test_split_body_lines_keeps_high_bytes() {
        let data = split_body_lines(b"\xFF\xFE=J\r\n..x\xE0\r\n.\r\ntrailer\r\n");
        assert_eq!(data, b"\xFF\xFE=J\n.x\xE0\n");
    }

    #[test]
    fn test_split_body_lines_without_terminator() {
        assert_eq!(split_body_lines(b"a\r\nb"), b"a\nb\n");
        assert!(split_body_lines(b"").is_empty());
    }
}
