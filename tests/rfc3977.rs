//! RFC 3977 - Network News Transfer Protocol (NNTP)
//!
//! These tests verify the response parsers the scanner relies on.
//! https://datatracker.ietf.org/doc/html/rfc3977

mod rfc3977 {
    mod group;
    mod response;
    mod xover;
}
