//! yEnc single-part decoding for article bodies
//!
//! yEnc is the binary-to-text encoding used for Usenet binaries: each byte
//! is shifted by 42 and the few critical results are escaped with `=`.
//!
//! Reference: http://www.yenc.org/yenc-draft.1.3.txt

mod decode;
mod params;
mod types;

pub use decode::decode;
pub use types::{YencDecoded, YencEnd, YencHeader, YencPart};
