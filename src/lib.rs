#![doc = include_str!("../README.md")]

/// Exclusion rules for assembled parts
pub mod blacklist;
mod client;
/// NNTP command builders and response parsers
pub mod commands;
mod config;
/// Header date parsing
pub mod dates;
/// RFC 2047 Encoded Words support for international headers
pub mod encoded_words;
mod error;
/// Part reassembly from overview records
pub mod parts;
mod response;
mod server;
/// Transport seam between the engine and the wire client
pub mod session;
/// yEnc decoding for Usenet binaries
pub mod yenc;

pub use blacklist::{
    BlacklistField, BlacklistRule, BlacklistSource, StaticBlacklist, filter_blacklisted,
    is_blacklisted,
};
pub use client::NntpClient;
pub use commands::{GroupInfo, OverviewRecord};
pub use config::{EngineConfig, ServerConfig};
pub use error::{FailureKind, NntpError, Result};
pub use parts::{Part, PartAssembler, RecordOutcome, Segment, generate_hash};
pub use response::{NntpBinaryResponse, NntpResponse, codes};
pub use server::{
    FractionNudge, RandomNudge, ScanResult, ScanStats, ScanTarget, Server, days_old,
    tolerance_for_days,
};
pub use session::{Connector, NntpConnector, Session};
