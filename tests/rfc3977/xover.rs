//! RFC 3977 Section 8.3 - OVER/XOVER Response Parsing Tests
//!
//! These tests verify compliance with XOVER response format:
//! - Tab-separated fields: article#, subject, from, date, message-id, references, bytes, lines
//! - Optional additional fields (like XREF) may be present

use nntp_scanner::commands::{parse_over_line, xover};

// Valid XOVER Line Parsing (RFC 3977 §8.3)

#[test]
fn test_xover_standard_8_fields() {
    let line = "12345\tTest Subject\tauthor@example.com\tMon, 1 Jan 2024 00:00:00 +0000\t<msgid@example>\t<ref@example>\t1024\t50";

    let entry = parse_over_line(line).unwrap();

    assert_eq!(entry.article_number, 12345);
    assert_eq!(entry.subject.as_deref(), Some("Test Subject"));
    assert_eq!(entry.from, "author@example.com");
    assert_eq!(entry.date, "Mon, 1 Jan 2024 00:00:00 +0000");
    assert_eq!(entry.message_id, "<msgid@example>");
    assert_eq!(entry.references, "<ref@example>");
    assert_eq!(entry.bytes, "1024");
    assert_eq!(entry.lines, "50");
    assert_eq!(entry.xref, "");
}

#[test]
fn test_xover_full_xref_field() {
    // LIST OVERVIEW.FMT marks Xref as "full": the header name is included
    let line = "12345\tSubject\tFrom\tDate\t<msgid>\t<refs>\t1000\t100\tXref: news.example.com alt.test:12345";

    let entry = parse_over_line(line).unwrap();

    assert_eq!(entry.xref, "news.example.com alt.test:12345");
}

#[test]
fn test_xover_bare_xref_field() {
    let line = "1\tSubject\tFrom\tDate\t<msgid>\t\t1000\t100\tnews.example.com alt.test:1";

    let entry = parse_over_line(line).unwrap();

    assert_eq!(entry.xref, "news.example.com alt.test:1");
}

#[test]
fn test_xover_extra_fields_ignored() {
    let line = "12345\tSubject\tFrom\tDate\t<msgid>\t<refs>\t1000\t100\txref:server group:12345\textra";

    let entry = parse_over_line(line).unwrap();

    assert_eq!(entry.article_number, 12345);
    assert_eq!(entry.bytes, "1000");
    assert_eq!(entry.xref, "server group:12345");
}

#[test]
fn test_xover_empty_references() {
    let line = "12345\tSubject\tFrom\tDate\t<msgid>\t\t1000\t100";

    let entry = parse_over_line(line).unwrap();

    assert_eq!(entry.references, "");
}

#[test]
fn test_xover_empty_subject_is_none() {
    let line = "12345\t\tFrom\tDate\t<msgid>\t<refs>\t1000\t100";

    let entry = parse_over_line(line).unwrap();

    assert_eq!(entry.subject, None);
}

#[test]
fn test_xover_short_line_keeps_number() {
    // Only the article number is required; the assembler judges the rest
    let entry = parse_over_line("77\tSubject (1/2)").unwrap();

    assert_eq!(entry.article_number, 77);
    assert_eq!(entry.subject.as_deref(), Some("Subject (1/2)"));
    assert_eq!(entry.bytes, "");
    assert_eq!(entry.message_id, "");
}

#[test]
fn test_xover_non_numeric_size_kept_verbatim() {
    let line = "5\tSubject\tFrom\tDate\t<msgid>\t\tbig\t100";

    let entry = parse_over_line(line).unwrap();

    assert_eq!(entry.bytes, "big");
}

// Invalid lines

#[test]
fn test_xover_invalid_article_number() {
    assert!(parse_over_line("abc\tSubject\tFrom\tDate\t<msgid>\t\t1\t1").is_err());
    assert!(parse_over_line("").is_err());
    assert!(parse_over_line("-5\tSubject").is_err());
}

// Command format (RFC 3977 §8.3.1 range form)

#[test]
fn test_xover_command_range() {
    assert_eq!(xover(1, 1000), "XOVER 1-1000\r\n");
    assert_eq!(xover(42, 42), "XOVER 42-42\r\n");
}
