//! Reassembly of overview records into multi-segment parts
//!
//! A binary posting is split over many articles whose subjects differ only
//! in a trailing `(i/n)` marker. Stripping the marker and hashing what is
//! left together with the poster, group and segment total gives a key that
//! every segment of the same part shares.

use crate::commands::OverviewRecord;
use crate::dates::parse_header_date;
use crate::encoded_words::decode_and_normalize;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use tracing::{debug, error};

/// "(i/n)" segment marker
static SEGMENT_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\((\d+)/(\d+)\)").ok());

/// One article carrying a piece of a part
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Message-ID without angle brackets
    pub message_id: String,
    /// 1-based segment index
    pub segment: u32,
    /// Article size in bytes
    pub size: u64,
}

/// A logical file part joined from its segments
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    /// Fingerprint shared by all segments of this part
    pub hash: String,
    /// Subject with the segment marker removed
    pub subject: String,
    /// Post date of the first segment seen
    pub posted: DateTime<Utc>,
    pub posted_by: String,
    pub group_name: String,
    pub xref: String,
    pub total_segments: u32,
    /// Always equal to `segments.len()`
    pub available_segments: u32,
    pub segments: BTreeMap<u32, Segment>,
}

impl Part {
    /// Whether every segment from 1 to `total_segments` has been seen
    pub fn is_complete(&self) -> bool {
        self.available_segments >= self.total_segments
    }
}

/// Fingerprint a part: MD5 hex digest of "subject.poster.group.total"
///
/// ```
/// let a = nntp_scanner::generate_hash("file.rar", "poster", "alt.test", 10);
/// let b = nntp_scanner::generate_hash("file.rar", "poster", "alt.test", 11);
/// assert_eq!(a.len(), 32);
/// assert_ne!(a, b);
/// ```
pub fn generate_hash(subject: &str, poster: &str, group: &str, total_segments: u32) -> String {
    let mut hasher = Md5::new();
    hasher.update(format!("{}.{}.{}.{}", subject, poster, group, total_segments).as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// What happened to one overview record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Became a new part or joined an existing one
    Assembled,
    /// Had no subject
    NoSubject,
    /// Not a binary segment (no marker, or a zero/oversized index)
    Ignored,
    /// Malformed size or date
    Dropped,
}

/// Accumulates parts for one scan of one group
#[derive(Debug)]
pub struct PartAssembler {
    group: String,
    parts: HashMap<String, Part>,
    ignored: u64,
    dropped: u64,
}

impl PartAssembler {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            parts: HashMap::new(),
            ignored: 0,
            dropped: 0,
        }
    }

    /// Feed one overview record
    pub fn add(&mut self, record: &OverviewRecord) -> RecordOutcome {
        let Some(raw_subject) = record.subject.as_deref() else {
            return RecordOutcome::NoSubject;
        };

        // The first marker is usually the file number, the last the segment
        let last_marker = SEGMENT_MARKER
            .as_ref()
            .and_then(|re| re.captures_iter(raw_subject).last());
        let Some(marker) = last_marker else {
            self.ignored += 1;
            return RecordOutcome::Ignored;
        };

        let Ok(size) = record.bytes.trim().parse::<u64>() else {
            debug!(
                "Bad size {:?} on article {}, dropping",
                record.bytes, record.article_number
            );
            self.dropped += 1;
            return RecordOutcome::Dropped;
        };

        let index = marker[1].parse::<u32>().ok().filter(|&n| n > 0);
        let total = marker[2].parse::<u32>().ok().filter(|&n| n > 0);
        let (Some(index), Some(total)) = (index, total) else {
            self.ignored += 1;
            return RecordOutcome::Ignored;
        };

        let range = marker.get(0).map_or(0..0, |m| m.range());
        let stripped = format!("{}{}", &raw_subject[..range.start], &raw_subject[range.end..]);
        let subject = decode_and_normalize(stripped.trim());
        let posted_by = decode_and_normalize(record.from.trim());

        let hash = generate_hash(&subject, &posted_by, &self.group, total);
        let segment = Segment {
            message_id: strip_brackets(&record.message_id).to_string(),
            segment: index,
            size,
        };

        if let Some(part) = self.parts.get_mut(&hash) {
            part.segments.insert(index, segment);
            part.available_segments = part.segments.len() as u32;
            return RecordOutcome::Assembled;
        }

        let posted = match parse_header_date(&record.date) {
            Ok(posted) => posted,
            Err(e) => {
                error!(
                    "Bad date on article {} in {}: {}",
                    record.article_number, self.group, e
                );
                self.dropped += 1;
                return RecordOutcome::Dropped;
            }
        };

        self.parts.insert(
            hash.clone(),
            Part {
                hash,
                subject,
                posted,
                posted_by,
                group_name: self.group.clone(),
                xref: record.xref.clone(),
                total_segments: total,
                available_segments: 1,
                segments: BTreeMap::from([(index, segment)]),
            },
        );
        RecordOutcome::Assembled
    }

    /// Records that were not binary segments
    pub fn ignored(&self) -> u64 {
        self.ignored
    }

    /// Records dropped for a malformed size or date
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Hand the assembled parts to the caller
    pub fn into_parts(self) -> HashMap<String, Part> {
        self.parts
    }
}

fn strip_brackets(message_id: &str) -> &str {
    let id = message_id.trim();
    id.strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(id)
}
