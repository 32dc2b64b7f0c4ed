//! Wire commands and reply parsers
//!
//! Builders return the full command line including CRLF.

pub mod article;
pub mod group;
pub mod over;
pub mod response;

pub use article::*;
pub use group::*;
pub use over::*;
pub use response::*;

pub fn authinfo_user(username: &str) -> String {
    format!("AUTHINFO USER {}\r\n", username)
}

/// The password appears in the returned line; never log it
pub fn authinfo_pass(password: &str) -> String {
    format!("AUTHINFO PASS {}\r\n", password)
}

/// Ask for zlib-compressed multi-line replies
///
/// After a 290, replies whose status line ends in `[COMPRESS=GZIP]` carry a
/// zlib block instead of plain lines.
pub fn xfeature_compress_gzip() -> &'static str {
    "XFEATURE COMPRESS GZIP\r\n"
}

pub fn quit() -> &'static str {
    "QUIT\r\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_commands() {
        assert_eq!(authinfo_user("reader"), "AUTHINFO USER reader\r\n");
        assert_eq!(authinfo_pass("s3cret"), "AUTHINFO PASS s3cret\r\n");
        assert_eq!(group("alt.binaries.misc"), "GROUP alt.binaries.misc\r\n");
        assert_eq!(head("4711"), "HEAD 4711\r\n");
        assert_eq!(body("<part1of9@poster>"), "BODY <part1of9@poster>\r\n");
        assert_eq!(xover(5000, 5999), "XOVER 5000-5999\r\n");
        assert_eq!(xfeature_compress_gzip(), "XFEATURE COMPRESS GZIP\r\n");
        assert_eq!(quit(), "QUIT\r\n");
    }
}
