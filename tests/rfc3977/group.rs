//! RFC 3977 Section 6.1.1 - GROUP Command Tests
//!
//! Response format: 211 number low high group

use nntp_scanner::NntpResponse;
use nntp_scanner::commands::{group, parse_group_response};
use nntp_scanner::{NntpError, codes};

fn response(code: u16, message: &str) -> NntpResponse {
    NntpResponse {
        code,
        message: message.to_string(),
        lines: vec![],
    }
}

#[test]
fn test_group_command_format() {
    assert_eq!(group("misc.test"), "GROUP misc.test\r\n");
}

#[test]
fn test_group_selected_response() {
    let info = parse_group_response(response(211, "1234 3000234 3002322 misc.test"), "misc.test")
        .unwrap();

    assert_eq!(info.count, 1234);
    assert_eq!(info.first, 3000234);
    assert_eq!(info.last, 3002322);
    assert_eq!(info.name, "misc.test");
}

#[test]
fn test_group_empty_group() {
    // RFC 3977: an empty group may report high = low - 1
    let info = parse_group_response(response(211, "0 4000 3999 example.empty"), "example.empty")
        .unwrap();

    assert_eq!(info.count, 0);
    assert_eq!(info.first, 4000);
    assert_eq!(info.last, 3999);
}

#[test]
fn test_group_server_casing_wins() {
    let info =
        parse_group_response(response(211, "5 1 5 Alt.Binaries.Test"), "alt.binaries.test").unwrap();

    assert_eq!(info.name, "Alt.Binaries.Test");
}

#[test]
fn test_group_trailing_text_ignored() {
    let info =
        parse_group_response(response(211, "5 1 5 alt.test Group selected"), "alt.test").unwrap();

    assert_eq!(info.name, "alt.test");
}

#[test]
fn test_group_no_such_group() {
    let err = parse_group_response(response(codes::NO_SUCH_GROUP, "No such newsgroup"), "x")
        .unwrap_err();

    assert!(matches!(err, NntpError::Protocol { code: 411, .. }));
}

#[test]
fn test_group_truncated_response() {
    let err = parse_group_response(response(211, "5 1"), "alt.test").unwrap_err();

    assert!(matches!(err, NntpError::InvalidResponse(_)));
}

#[test]
fn test_group_overflowing_number() {
    let err = parse_group_response(
        response(211, "5 1 99999999999999999999999 alt.test"),
        "alt.test",
    )
    .unwrap_err();

    assert!(matches!(err, NntpError::InvalidResponse(_)));
}
