use crate::{NntpError, Result};
use std::collections::HashMap;

use super::types::{YencEnd, YencHeader, YencPart};

fn missing(key: &str, keyword: &str) -> NntpError {
    NntpError::InvalidResponse(format!("Missing '{}' parameter in {}", key, keyword))
}

fn required<T: std::str::FromStr>(
    params: &HashMap<&str, &str>,
    key: &str,
    keyword: &str,
) -> Result<T> {
    params
        .get(key)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| missing(key, keyword))
}

pub(super) fn parse_ybegin(line: &str) -> Result<YencHeader> {
    let rest = line
        .strip_prefix("=ybegin ")
        .ok_or_else(|| NntpError::InvalidResponse(format!("Invalid yEnc header: {}", line)))?;

    // name= is always last and runs to the end of the line
    let (rest, name) = match rest.find("name=") {
        Some(idx) => (&rest[..idx], rest[idx + 5..].trim_end().to_string()),
        None => return Err(missing("name", "=ybegin")),
    };
    let params = parse_params(rest);

    Ok(YencHeader {
        line: required(&params, "line", "=ybegin")?,
        size: required(&params, "size", "=ybegin")?,
        name,
        part: params.get("part").and_then(|s| s.parse().ok()),
        total: params.get("total").and_then(|s| s.parse().ok()),
    })
}

pub(super) fn parse_ypart(line: &str) -> Result<YencPart> {
    let rest = line
        .strip_prefix("=ypart ")
        .ok_or_else(|| NntpError::InvalidResponse(format!("Invalid yEnc part header: {}", line)))?;
    let params = parse_params(rest);

    Ok(YencPart {
        begin: required(&params, "begin", "=ypart")?,
        end: required(&params, "end", "=ypart")?,
    })
}

pub(super) fn parse_yend(line: &str) -> Result<YencEnd> {
    let rest = line
        .strip_prefix("=yend ")
        .ok_or_else(|| NntpError::InvalidResponse(format!("Invalid yEnc trailer: {}", line)))?;
    let params = parse_params(rest);

    let hex = |key: &str| {
        params
            .get(key)
            .and_then(|s| u32::from_str_radix(s.trim_start_matches("0x"), 16).ok())
    };

    Ok(YencEnd {
        size: required(&params, "size", "=yend")?,
        crc32: hex("crc32"),
        pcrc32: hex("pcrc32"),
    })
}

/// Split space-separated key=value pairs
fn parse_params(params: &str) -> HashMap<&str, &str> {
    params
        .split_whitespace()
        .filter_map(|pair| pair.split_once('='))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ybegin_simple() {
        let header = parse_ybegin("=ybegin line=128 size=123456 name=test.bin").unwrap();
        assert_eq!(header.line, 128);
        assert_eq!(header.size, 123456);
        assert_eq!(header.name, "test.bin");
        assert_eq!(header.part, None);
    }

    #[test]
    fn test_parse_ybegin_name_with_spaces() {
        let header =
            parse_ybegin("=ybegin part=2 total=9 line=128 size=500 name=My Holiday 2024.rar ")
                .unwrap();
        assert_eq!(header.name, "My Holiday 2024.rar");
        assert_eq!(header.part, Some(2));
        assert_eq!(header.total, Some(9));
    }

    #[test]
    fn test_parse_ybegin_missing_fields() {
        assert!(parse_ybegin("=ybegin line=128 size=10").is_err());
        assert!(parse_ybegin("=ybegin size=10 name=x").is_err());
        assert!(parse_ybegin("begin line=128 size=10 name=x").is_err());
    }

    #[test]
    fn test_parse_ypart() {
        let part = parse_ypart("=ypart begin=1 end=384000").unwrap();
        assert_eq!((part.begin, part.end), (1, 384000));
    }

    #[test]
    fn test_parse_yend() {
        let end = parse_yend("=yend size=4 part=1 pcrc32=ABCD1234 crc32=0e7e1273").unwrap();
        assert_eq!(end.size, 4);
        assert_eq!(end.pcrc32, Some(0xabcd1234));
        assert_eq!(end.crc32, Some(0x0e7e1273));
    }

    #[test]
    fn test_parse_yend_bad_crc_is_absent() {
        let end = parse_yend("=yend size=4 crc32=zzzz").unwrap();
        assert_eq!(end.crc32, None);
    }
}
