//! RFC 2047 encoded-word decoding for overview and header text
//!
//! Encoded words have the format `=?charset?encoding?encoded-text?=` with
//! `B` (base64) or `Q` (quoted-printable variant) encoding. Decoding never
//! fails: words that do not decode are passed through unchanged, invalid
//! bytes become U+FFFD and control characters are replaced.
//!
//! ```
//! use nntp_scanner::encoded_words::{decode_header_value, normalize_header_text};
//!
//! assert_eq!(decode_header_value("=?UTF-8?B?SGVsbG8gV29ybGQ=?="), "Hello World");
//! assert_eq!(decode_header_value("=?ISO-8859-1?Q?Andr=E9?= <a@b>"), "André <a@b>");
//! assert_eq!(normalize_header_text("bad\u{0}name"), "bad\u{FFFD}name");
//! ```

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// Decode a single encoded word, or `None` if it is not a decodable one
pub fn decode_encoded_word(encoded: &str) -> Option<String> {
    let inner = encoded.strip_prefix("=?")?.strip_suffix("?=")?;

    let mut parts = inner.splitn(3, '?');
    let charset = parts.next()?;
    let encoding = parts.next()?;
    let text = parts.next()?;

    let bytes = match encoding {
        "B" | "b" => BASE64.decode(text.trim_end_matches('=').to_string() + padding(text)).ok()?,
        "Q" | "q" => decode_q(text),
        _ => return None,
    };

    Some(charset_to_string(&bytes, charset))
}

/// Padding that makes a base64 text a multiple of four characters long
fn padding(text: &str) -> &'static str {
    match text.trim_end_matches('=').len() % 4 {
        2 => "==",
        3 => "=",
        _ => "",
    }
}

/// Decode a header value that may mix plain text and encoded words
///
/// Whitespace between two adjacent encoded words is dropped; anything else
/// is kept as written.
pub fn decode_header_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    let mut pending_space = "";
    let mut last_was_encoded = false;

    while !rest.is_empty() {
        if rest.starts_with("=?") {
            if let Some(end) = find_encoded_word_end(rest) {
                if let Some(decoded) = decode_encoded_word(&rest[..end]) {
                    if !last_was_encoded {
                        result.push_str(pending_space);
                    }
                    pending_space = "";
                    result.push_str(&decoded);
                    last_was_encoded = true;
                    rest = &rest[end..];
                    continue;
                }
            }
        }

        let ws_len = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        if ws_len > 0 {
            result.push_str(pending_space);
            pending_space = &rest[..ws_len];
            rest = &rest[ws_len..];
            continue;
        }

        result.push_str(pending_space);
        pending_space = "";
        last_was_encoded = false;

        let ch_len = rest.chars().next().map_or(1, char::len_utf8);
        result.push_str(&rest[..ch_len]);
        rest = &rest[ch_len..];
    }

    result.push_str(pending_space);
    result
}

/// Replace control characters so the text is safe to store and hash
pub fn normalize_header_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

/// Decode encoded words, then normalize the result
pub fn decode_and_normalize(value: &str) -> String {
    normalize_header_text(&decode_header_value(value))
}

/// Byte index just past the closing `?=`, if `input` opens an encoded word
fn find_encoded_word_end(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut question_marks = 0;

    for i in 2..bytes.len() {
        match bytes[i] {
            b'?' => {
                question_marks += 1;
                if question_marks >= 3 && bytes.get(i + 1) == Some(&b'=') {
                    return Some(i + 2);
                }
            }
            b' ' | b'\t' => return None,
            _ => {}
        }
    }

    None
}

/// Decode Q encoding: `_` is a space, `=XX` a hex byte
fn decode_q(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'_' => out.push(b' '),
            b'=' if i + 2 < bytes.len() => {
                match std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'='),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }

    out
}

/// Convert decoded bytes to text according to the declared charset
fn charset_to_string(bytes: &[u8], charset: &str) -> String {
    // RFC 2231 language suffix: "utf-8*en"
    let charset = charset.split('*').next().unwrap_or(charset);

    match charset.to_ascii_lowercase().as_str() {
        "iso-8859-1" | "latin1" | "us-ascii" => bytes.iter().map(|&b| b as char).collect(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}
