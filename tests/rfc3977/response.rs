//! RFC 3977 Section 3.2 - Response Code Tests
//!
//! Every response starts with a three-digit status code. The first digit
//! gives the class: 1xx informative, 2xx ok, 3xx continue, 4xx and 5xx error.

use nntp_scanner::NntpResponse;
use nntp_scanner::codes;
use nntp_scanner::commands::{parse_response_line, parse_single_response};

#[test]
fn test_status_line_split() {
    let (code, message) = parse_response_line("224 Overview information follows").unwrap();

    assert_eq!(code, codes::OVERVIEW_INFO_FOLLOWS);
    assert_eq!(message, "Overview information follows");
}

#[test]
fn test_compression_tag_kept_in_message() {
    let (code, message) = parse_response_line("224 compressed data follows [COMPRESS=GZIP]").unwrap();

    assert_eq!(code, 224);
    assert!(message.ends_with("[COMPRESS=GZIP]"));
}

#[test]
fn test_single_response_has_no_lines() {
    let response = parse_single_response("205 closing connection").unwrap();

    assert_eq!(response.code, codes::CLOSING_CONNECTION);
    assert!(response.lines.is_empty());
}

#[test]
fn test_response_classes() {
    let classify = |code| NntpResponse {
        code,
        message: String::new(),
        lines: vec![],
    };

    assert!(classify(211).is_success());
    assert!(classify(381).is_continuation());
    assert!(classify(430).is_error());
    assert!(classify(502).is_error());
    assert!(!classify(381).is_success());
}

#[test]
fn test_malformed_status_lines() {
    assert!(parse_response_line("").is_err());
    assert!(parse_response_line("OK").is_err());
    assert!(parse_response_line("2x1 group").is_err());
    assert!(parse_response_line("2110 group").is_err());
}

#[test]
fn test_code_constants() {
    assert_eq!(codes::GROUP_SELECTED, 211);
    assert_eq!(codes::HEAD_FOLLOWS, 221);
    assert_eq!(codes::BODY_FOLLOWS, 222);
    assert_eq!(codes::NO_SUCH_GROUP, 411);
    assert_eq!(codes::NO_GROUP_SELECTED, 412);
    assert_eq!(codes::AUTH_ACCEPTED, 281);
    assert_eq!(codes::AUTH_CONTINUE, 381);
}
