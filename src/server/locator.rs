//! Mapping dates to article numbers
//!
//! Article numbers grow with time but not evenly, and some articles have
//! expired or cannot be dated. [`Server::day_to_post`] interpolates between
//! two dated articles, moves the bracket towards the target and stops once
//! a candidate is within a tolerance that grows with the requested age.

use super::Server;
use crate::dates::parse_header_date;
use crate::encoded_words::decode_header_value;
use crate::session::{Connector, Session};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Relative step applied to the interpolation fraction when a candidate has no date
const NUDGE_STEP: f64 = 0.01;

/// Moves the interpolation fraction away from an undatable candidate
pub trait FractionNudge {
    /// Return the fraction to try next
    fn nudge(&mut self, fraction: f64) -> f64;
}

/// 1% of the current fraction up or down at random, reflected at 0 and 1
///
/// A fraction of exactly 0 moves by 0.01 instead, or it could never leave.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNudge;

impl FractionNudge for RandomNudge {
    fn nudge(&mut self, fraction: f64) -> f64 {
        let sign = if rand::thread_rng().gen_bool(0.5) {
            1.0
        } else {
            -1.0
        };
        reflect(fraction, sign * relative_step(fraction))
    }
}

fn relative_step(fraction: f64) -> f64 {
    if fraction > 0.0 {
        fraction * NUDGE_STEP
    } else {
        NUDGE_STEP
    }
}

/// Apply `step`, stepping the other way instead if that would leave [0, 1]
pub(crate) fn reflect(fraction: f64, step: f64) -> f64 {
    let next = fraction + step;
    if (0.0..=1.0).contains(&next) {
        next
    } else {
        fraction - step
    }
}

/// Acceptable distance in days between target and found article
pub fn tolerance_for_days(days: u32) -> f64 {
    match days {
        0..=50 => 1.0,
        51..=100 => 5.0,
        101..=1000 => 10.0,
        _ => 20.0,
    }
}

/// Whole days between `date` and now
pub fn days_old(date: DateTime<Utc>) -> i64 {
    (Utc::now() - date).num_days()
}

/// Pick the posting date header out of a header block
///
/// Continuation lines are unfolded. `NNTP-Posting-Date` wins over `Date`;
/// `X-Server-Date` is never used.
fn posting_date_header(lines: &[String]) -> Option<String> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for line in lines {
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
        } else if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let find = |wanted: &str| {
        headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, value)| decode_header_value(value))
    };
    find("NNTP-Posting-Date").or_else(|| find("Date"))
}

/// Fraction of the way `target` lies from `bottom` to `top`, or `None` for an empty span
fn interpolate(target: DateTime<Utc>, bottom: DateTime<Utc>, top: DateTime<Utc>) -> Option<f64> {
    let total = (top - bottom).num_milliseconds();
    if total == 0 {
        return None;
    }
    Some((target - bottom).num_milliseconds() as f64 / total as f64)
}

fn candidate_at(bottom: u64, top: u64, fraction: f64) -> u64 {
    let position = bottom as f64 + (top as f64 - bottom as f64) * fraction;
    position.round().max(0.0) as u64
}

impl<C: Connector> Server<C> {
    /// Date an article from its headers, converted to UTC
    ///
    /// Returns `None` if the group or article is unavailable, or when no
    /// usable date header parses.
    pub async fn post_date(&mut self, group: &str, article: u64) -> Option<DateTime<Utc>> {
        self.connect().await;
        let delay = self.config.retry_delay;
        self.ensure_group(group, delay).await.ok()?;

        let lines = self
            .guarded(Some(group), delay, async |session: &mut C::Session| {
                session.head(article).await
            })
            .await
            .ok()?;

        let Some(value) = posting_date_header(&lines) else {
            debug!("{}: article {} has no date header", group, article);
            return None;
        };

        match parse_header_date(&value) {
            Ok(date) => Some(date),
            Err(e) => {
                error!("{}: date parse failed while dating article {}: {}", group, article, e);
                None
            }
        }
    }

    /// Find an article number roughly `days` days old
    ///
    /// Returns the group's first article when the target predates it, and
    /// `None` when the target is newer than the last article or the group
    /// cannot be dated.
    pub async fn day_to_post(&mut self, group: &str, days: u32) -> Option<u64> {
        info!("{}: finding post {} days old...", group, days);

        let info = self.group(group).await?;
        let mut tolerance = tolerance_for_days(days);
        let target = Utc::now() - ChronoDuration::days(i64::from(days));

        let Some(mut bottom_date) = self.post_date(group, info.first).await else {
            error!("{}: can't get first date on group, try again later", group);
            return None;
        };
        if target < bottom_date {
            info!("{}: post was before first available, starting from the beginning", group);
            return Some(info.first);
        }

        let Some(mut top_date) = self.post_date(group, info.last).await else {
            warn!("{}: can't get last date on group, try again later", group);
            return None;
        };
        if target > top_date {
            info!("{}: requested post was newer than most recent, ending", group);
            return None;
        }

        let (mut bottom, mut top) = (info.first, info.last);
        let mut seen = HashSet::new();

        loop {
            let Some(mut fraction) = interpolate(target, bottom_date, top_date) else {
                return Some(bottom);
            };

            let mut failures = 0u32;
            let (candidate, candidate_date) = loop {
                let candidate = candidate_at(bottom, top, fraction);
                if let Some(date) = self.post_date(group, candidate).await {
                    break (candidate, date);
                }

                failures += 1;
                if self
                    .config
                    .max_probe_failures
                    .is_some_and(|limit| failures >= limit)
                {
                    warn!(
                        "{}: {} candidates in a row could not be dated, giving up",
                        group, failures
                    );
                    return None;
                }
                fraction = self.nudge.nudge(fraction);
            };

            // Holes in the numbering can bounce the search between the same
            // articles; widening the tolerance breaks the cycle
            if !seen.insert(candidate) {
                let adjustment = tolerance / 2.0;
                debug!(
                    "{}: seen post {} more than once, increasing tolerance by {}",
                    group, candidate, adjustment
                );
                tolerance += adjustment;
            }

            let distance = (target - candidate_date).num_seconds().abs() as f64;
            if distance < tolerance * SECONDS_PER_DAY {
                info!("{}: found post {} ({} days old)", group, candidate, days_old(candidate_date));
                return Some(candidate);
            }

            if candidate_date > target {
                top = candidate;
                top_date = candidate_date;
            } else {
                bottom = candidate;
                bottom_date = candidate_date;
            }

            debug!(
                "{}: post {} was {} days old",
                group,
                candidate,
                days_old(candidate_date)
            );
        }
    }
}
