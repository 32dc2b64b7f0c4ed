use crate::{NntpError, Result};
use crc32fast::Hasher;

use super::params::{parse_ybegin, parse_yend, parse_ypart};
use super::types::YencDecoded;

fn invalid(message: &str) -> NntpError {
    NntpError::InvalidResponse(message.to_string())
}

/// Decode one yEnc-encoded article body
///
/// Lines before `=ybegin` are skipped. A trailer CRC that does not match the
/// decoded payload fails the decode.
///
/// # Example
/// ```
/// let body = b"=ybegin line=128 size=4 name=test.txt\n~\x8f\x9d\x9e\n=yend size=4 crc32=784dd132\n";
/// let decoded = nntp_scanner::yenc::decode(body).unwrap();
/// assert_eq!(decoded.data, b"Test");
/// ```
///
/// # Errors
///
/// Returns [`NntpError::InvalidResponse`] when the header or trailer is
/// missing or malformed, when an escape is cut off, or on a CRC mismatch.
pub fn decode(input: &[u8]) -> Result<YencDecoded> {
    let lines: Vec<&[u8]> = input
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect();

    let begin_idx = lines
        .iter()
        .position(|line| line.starts_with(b"=ybegin "))
        .ok_or_else(|| invalid("Missing =ybegin header"))?;
    let header = parse_ybegin(&String::from_utf8_lossy(lines[begin_idx]))?;

    let mut data_start = begin_idx + 1;
    let mut part = None;
    if let Some(line) = lines.get(data_start)
        && line.starts_with(b"=ypart ")
    {
        part = Some(parse_ypart(&String::from_utf8_lossy(line))?);
        data_start += 1;
    }

    let trailer_idx = lines
        .iter()
        .rposition(|line| line.starts_with(b"=yend "))
        .filter(|&idx| idx >= data_start)
        .ok_or_else(|| invalid("Missing =yend trailer"))?;
    let trailer = parse_yend(&String::from_utf8_lossy(lines[trailer_idx]))?;

    let capacity = usize::try_from(trailer.size).unwrap_or(0);
    let mut data = Vec::with_capacity(capacity);
    for line in &lines[data_start..trailer_idx] {
        decode_line(line, &mut data)?;
    }

    let mut hasher = Hasher::new();
    hasher.update(&data);

    let decoded = YencDecoded {
        header,
        part,
        trailer,
        data,
        calculated_crc32: hasher.finalize(),
    };

    if !decoded.crc_matches() {
        return Err(NntpError::InvalidResponse(format!(
            "yEnc CRC mismatch for {}: expected {:08x}, got {:08x}",
            decoded.header.name,
            decoded.expected_crc32().unwrap_or_default(),
            decoded.calculated_crc32
        )));
    }

    Ok(decoded)
}

/// Decode a single data line
///
/// Plain bytes are `(b - 42) mod 256`; an escape `=X` is `(X - 106) mod 256`.
fn decode_line(line: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut bytes = line.iter();

    while let Some(&byte) = bytes.next() {
        if byte == b'=' {
            let &escaped = bytes
                .next()
                .ok_or_else(|| invalid("Incomplete escape sequence at end of line"))?;
            output.push(escaped.wrapping_sub(106));
        } else {
            output.push(byte.wrapping_sub(42));
        }
    }

    Ok(())
}
