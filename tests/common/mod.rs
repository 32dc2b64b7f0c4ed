//! In-memory NNTP transport for engine tests
//!
//! `FakeConnector` hands out `FakeSession`s that all read from one shared
//! `FakeNews` state. Tests script failures per operation and read back call
//! counters afterwards.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use nntp_scanner::{Connector, GroupInfo, NntpError, OverviewRecord, Result, Session};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

pub const GROUP: &str = "alt.binaries.test";

/// Failure to inject into the next call of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fail {
    Timeout,
    Closed,
    Rejected(u16),
    Garbage,
    Auth,
}

impl Fail {
    fn error(self) -> NntpError {
        match self {
            Fail::Timeout => NntpError::Timeout,
            Fail::Closed => NntpError::ConnectionClosed,
            Fail::Rejected(code) => NntpError::Protocol {
                code,
                message: "rejected".to_string(),
            },
            Fail::Garbage => NntpError::InvalidResponse("garbage".to_string()),
            Fail::Auth => NntpError::AuthFailed("bad password".to_string()),
        }
    }
}

/// Call counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Calls {
    pub connects: u32,
    pub selects: Vec<String>,
    pub overviews: Vec<(u64, u64)>,
    pub heads: Vec<u64>,
    pub bodies: Vec<String>,
    pub quits: u32,
}

/// Everything the fake server knows
#[derive(Debug, Default)]
pub struct FakeNews {
    pub groups: HashMap<String, GroupInfo>,
    pub overviews: BTreeMap<u64, OverviewRecord>,
    pub heads: HashMap<u64, Vec<String>>,
    pub bodies: HashMap<String, Vec<u8>>,
    pub connect_failures: VecDeque<Fail>,
    pub select_failures: VecDeque<Fail>,
    pub overview_failures: VecDeque<Fail>,
    pub head_failures: VecDeque<Fail>,
    pub body_failures: VecDeque<Fail>,
    pub quit_failures: VecDeque<Fail>,
    pub calls: Calls,
}

impl FakeNews {
    pub fn add_group(&mut self, name: &str, first: u64, last: u64) {
        self.groups.insert(
            name.to_string(),
            GroupInfo {
                count: last.saturating_sub(first) + 1,
                first,
                last,
                name: name.to_string(),
            },
        );
    }

    pub fn add_overview(&mut self, record: OverviewRecord) {
        self.overviews.insert(record.article_number, record);
    }

    /// Date an article via a plain `Date:` header
    pub fn add_dated(&mut self, article: u64, date: DateTime<Utc>) {
        self.heads.insert(
            article,
            vec![
                format!("Message-ID: <{}@fake>", article),
                format!("Date: {}", date.to_rfc2822()),
                "Subject: test".to_string(),
            ],
        );
    }
}

/// Shared handle to the fake server state
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    news: Arc<Mutex<FakeNews>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(first: u64, last: u64) -> Self {
        let connector = Self::new();
        connector.news().add_group(GROUP, first, last);
        connector
    }

    pub fn news(&self) -> MutexGuard<'_, FakeNews> {
        self.news.lock().unwrap()
    }

    pub fn calls(&self) -> Calls {
        self.news().calls.clone()
    }
}

impl Connector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self) -> Result<FakeSession> {
        let mut news = self.news();
        news.calls.connects += 1;
        if let Some(fail) = news.connect_failures.pop_front() {
            return Err(fail.error());
        }
        Ok(FakeSession {
            news: Arc::clone(&self.news),
            selected: None,
            broken: false,
        })
    }
}

pub struct FakeSession {
    news: Arc<Mutex<FakeNews>>,
    selected: Option<String>,
    broken: bool,
}

impl FakeSession {
    fn news(&self) -> MutexGuard<'_, FakeNews> {
        self.news.lock().unwrap()
    }

    fn injected(&mut self, fail: Option<Fail>) -> Result<()> {
        match fail {
            Some(Fail::Garbage) => {
                self.broken = true;
                Err(Fail::Garbage.error())
            }
            Some(fail) => Err(fail.error()),
            None => Ok(()),
        }
    }
}

impl Session for FakeSession {
    async fn select_group(&mut self, group: &str) -> Result<GroupInfo> {
        let fail = {
            let mut news = self.news();
            news.calls.selects.push(group.to_string());
            news.select_failures.pop_front()
        };
        self.injected(fail)?;

        let info = self.news().groups.get(group).cloned();
        match info {
            Some(info) => {
                self.selected = Some(group.to_string());
                Ok(info)
            }
            None => {
                self.selected = None;
                Err(NntpError::NoSuchGroup(group.to_string()))
            }
        }
    }

    async fn overview(&mut self, first: u64, last: u64) -> Result<Vec<OverviewRecord>> {
        let fail = {
            let mut news = self.news();
            news.calls.overviews.push((first, last));
            news.overview_failures.pop_front()
        };
        self.injected(fail)?;

        if self.selected.is_none() {
            return Err(NntpError::NoGroupSelected);
        }
        let news = self.news();
        Ok(news
            .overviews
            .range(first..=last)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn head(&mut self, article: u64) -> Result<Vec<String>> {
        let fail = {
            let mut news = self.news();
            news.calls.heads.push(article);
            news.head_failures.pop_front()
        };
        self.injected(fail)?;

        if self.selected.is_none() {
            return Err(NntpError::NoGroupSelected);
        }
        self.news()
            .heads
            .get(&article)
            .cloned()
            .ok_or_else(|| NntpError::NoSuchArticle(article.to_string()))
    }

    async fn body(&mut self, message_id: &str) -> Result<Vec<u8>> {
        let fail = {
            let mut news = self.news();
            news.calls.bodies.push(message_id.to_string());
            news.body_failures.pop_front()
        };
        self.injected(fail)?;

        self.news()
            .bodies
            .get(message_id)
            .cloned()
            .ok_or_else(|| NntpError::NoSuchArticle(message_id.to_string()))
    }

    async fn quit(&mut self) -> Result<()> {
        let fail = {
            let mut news = self.news();
            news.calls.quits += 1;
            news.quit_failures.pop_front()
        };
        self.injected(fail)
    }

    fn is_broken(&self) -> bool {
        self.broken
    }
}

/// Overview record for a binary segment with sensible defaults
pub fn segment(number: u64, subject: &str, poster: &str) -> OverviewRecord {
    OverviewRecord {
        article_number: number,
        subject: Some(subject.to_string()),
        from: poster.to_string(),
        date: "Mon, 01 Jan 2024 10:00:00 +0000".to_string(),
        message_id: format!("<{}@fake>", number),
        references: String::new(),
        bytes: "384000".to_string(),
        lines: "3000".to_string(),
        xref: format!("news.fake {}:{}", GROUP, number),
    }
}

/// yEnc-encode `data` as a single-part article body with a CRC trailer
pub fn yenc_body(name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!("=ybegin line=128 size={} name={}\r\n", data.len(), name).into_bytes();
    for chunk in data.chunks(128) {
        for &byte in chunk {
            let encoded = byte.wrapping_add(42);
            match encoded {
                0 | b'\n' | b'\r' | b'=' => {
                    body.push(b'=');
                    body.push(encoded.wrapping_add(64));
                }
                _ => body.push(encoded),
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    body.extend_from_slice(
        format!("=yend size={} crc32={:08x}\r\n", data.len(), hasher.finalize()).as_bytes(),
    );
    body
}

/// Install a test subscriber once; output only shows with `--nocapture`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
