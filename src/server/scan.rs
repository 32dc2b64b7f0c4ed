//! Overview scanning and part assembly for one group

use super::Server;
use crate::blacklist::filter_blacklisted;
use crate::commands::OverviewRecord;
use crate::error::Result;
use crate::parts::{Part, PartAssembler};
use crate::session::{Connector, Session};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Article numbers to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// One inclusive range; articles not returned are reported as missed
    Range { first: u64, last: u64 },
    /// Several inclusive ranges; a range that yields nothing is missed whole
    Ranges(Vec<(u64, u64)>),
}

impl ScanTarget {
    fn ranges(&self) -> Vec<(u64, u64)> {
        match self {
            ScanTarget::Range { first, last } => vec![(*first, *last)],
            ScanTarget::Ranges(ranges) => ranges.clone(),
        }
    }
}

/// Counters for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Overview records received
    pub received: usize,
    /// Parts assembled before blacklisting
    pub total_parts: usize,
    /// Records that were not binary segments
    pub ignored: u64,
    /// Records with a malformed size or date
    pub dropped: u64,
    /// Parts removed by the blacklist
    pub blacklisted: usize,
    pub elapsed: Duration,
}

/// Outcome of [`Server::scan`]
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// `true` when at least one overview record came back
    pub success: bool,
    /// Surviving parts keyed by fingerprint
    pub parts: HashMap<String, Part>,
    /// Article numbers received, in server order
    pub received: Vec<u64>,
    /// Article numbers requested but not received, ascending
    pub missed: Vec<u64>,
    pub stats: ScanStats,
}

impl<C: Connector> Server<C> {
    /// Scan a group for binary segments and join them into parts
    ///
    /// Each range is fetched with up to `max_range_attempts` tries; a range
    /// that keeps failing is abandoned and shows up only as missed.
    ///
    /// # Errors
    ///
    /// Returns the error from selecting the group. Failures after that are
    /// absorbed into the result.
    pub async fn scan(&mut self, group: &str, target: ScanTarget) -> Result<ScanResult> {
        let start = Instant::now();
        self.connect().await;

        let delay = self.config.scan_retry_delay;
        self.select(group, delay).await?;

        let ranges = target.ranges();
        let split = matches!(target, ScanTarget::Ranges(_));

        let mut overviews = Vec::new();
        let mut missed = Vec::new();
        for &(first, last) in &ranges {
            let fetched = self.fetch_range(group, first, last).await;
            match fetched {
                Some(records) if !records.is_empty() => overviews.extend(records),
                _ if split => missed.extend(first..=last),
                _ => {}
            }
        }

        let mut received = Vec::with_capacity(overviews.len());
        let mut assembler = PartAssembler::new(group);
        for record in &overviews {
            received.push(record.article_number);
            assembler.add(record);
        }

        let ignored = assembler.ignored();
        let dropped = assembler.dropped();
        let mut parts = assembler.into_parts();
        let total_parts = parts.len();

        let blacklisted = if parts.is_empty() {
            0
        } else {
            let rules = self.blacklist.active_rules();
            filter_blacklisted(&mut parts, group, &rules)
        };

        if let ScanTarget::Range { first, last } = target {
            missed = missing_numbers(first, last, &received);
        }

        let stats = ScanStats {
            received: received.len(),
            total_parts,
            ignored,
            dropped,
            blacklisted,
            elapsed: start.elapsed(),
        };

        let (lo, hi) = span(&ranges);
        info!(
            "{}: retrieved {} - {} in {:.2}s [{} recv, {} pts, {} ign, {} drp, {} blk]",
            group,
            lo,
            hi,
            stats.elapsed.as_secs_f64(),
            stats.received,
            stats.total_parts,
            stats.ignored,
            stats.dropped,
            stats.blacklisted
        );

        Ok(ScanResult {
            success: !received.is_empty(),
            parts,
            received,
            missed,
            stats,
        })
    }

    /// Fetch one range, retrying through the recovery scope
    async fn fetch_range(
        &mut self,
        group: &str,
        first: u64,
        last: u64,
    ) -> Option<Vec<OverviewRecord>> {
        let attempts = self.config.max_range_attempts.max(1);
        let delay = self.config.scan_retry_delay;

        for attempt in 1..=attempts {
            debug!("{}: getting range {}-{} (attempt {})", group, first, last, attempt);
            let result = self
                .guarded(Some(group), delay, async |session: &mut C::Session| {
                    session.overview(first, last).await
                })
                .await;

            match result {
                Ok(records) => return Some(records),
                Err(e) if attempt == attempts => {
                    warn!(
                        "{}: range {}-{} failed {} times ({}), giving up for now",
                        group, first, last, attempts, e
                    );
                }
                Err(_) => {}
            }
        }

        None
    }
}

/// Numbers in `first..=last` that are not in `received`, ascending
fn missing_numbers(first: u64, last: u64, received: &[u64]) -> Vec<u64> {
    let seen: HashSet<u64> = received.iter().copied().collect();
    (first..=last).filter(|n| !seen.contains(n)).collect()
}

/// Lowest first and highest last over all ranges
fn span(ranges: &[(u64, u64)]) -> (u64, u64) {
    let lo = ranges.iter().map(|r| r.0).min().unwrap_or(0);
    let hi = ranges.iter().map(|r| r.1).max().unwrap_or(0);
    (lo, hi)
}
