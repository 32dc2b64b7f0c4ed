//! Exclusion rules applied to assembled parts
//!
//! A rule pairs a case-insensitive pattern with a group scope, both regular
//! expressions with search semantics. A part is dropped when any enabled rule
//! whose scope matches the group also matches the rule's field of the part.

use crate::error::Result;
use crate::parts::Part;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::debug;

/// Part field a rule pattern is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlacklistField {
    Subject,
    Poster,
    Xref,
}

/// A compiled exclusion rule
#[derive(Debug, Clone)]
pub struct BlacklistRule {
    pub field: BlacklistField,
    pattern: Regex,
    group: Regex,
    pub enabled: bool,
    pub description: Option<String>,
}

fn compile(source: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(source).case_insensitive(true).build()?)
}

impl BlacklistRule {
    /// Compile an enabled rule
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::InvalidPattern`](crate::NntpError::InvalidPattern)
    /// if either expression does not compile.
    pub fn new(field: BlacklistField, pattern: &str, group: &str) -> Result<Self> {
        Ok(Self {
            field,
            pattern: compile(pattern)?,
            group: compile(group)?,
            enabled: true,
            description: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn group_scope(&self) -> &str {
        self.group.as_str()
    }

    /// Whether the rule's group scope covers `group`
    pub fn applies_to(&self, group: &str) -> bool {
        self.group.is_match(group)
    }

    /// Whether the rule's pattern matches the chosen field of `part`
    pub fn matches(&self, part: &Part) -> bool {
        let value = match self.field {
            BlacklistField::Subject => &part.subject,
            BlacklistField::Poster => &part.posted_by,
            BlacklistField::Xref => &part.xref,
        };
        self.pattern.is_match(value)
    }
}

/// Read-only provider of the current rule set
///
/// Implementations are shared between scanners and must hand out a
/// snapshot; rules changed afterwards do not affect a scan in progress.
pub trait BlacklistSource {
    /// Snapshot of the enabled rules
    fn active_rules(&self) -> Vec<BlacklistRule>;
}

/// Fixed in-memory rule set
#[derive(Debug, Clone, Default)]
pub struct StaticBlacklist {
    rules: Vec<BlacklistRule>,
}

impl StaticBlacklist {
    pub fn new(rules: Vec<BlacklistRule>) -> Self {
        Self { rules }
    }

    /// A rule set that blocks nothing
    pub fn empty() -> Self {
        Self::default()
    }
}

impl BlacklistSource for StaticBlacklist {
    fn active_rules(&self) -> Vec<BlacklistRule> {
        self.rules.iter().filter(|r| r.enabled).cloned().collect()
    }
}

/// Whether any enabled, group-scoped rule matches `part`
pub fn is_blacklisted(part: &Part, group: &str, rules: &[BlacklistRule]) -> bool {
    rules
        .iter()
        .any(|rule| rule.enabled && rule.applies_to(group) && rule.matches(part))
}

/// Remove every blacklisted part, returning how many were removed
pub fn filter_blacklisted(
    parts: &mut HashMap<String, Part>,
    group: &str,
    rules: &[BlacklistRule],
) -> usize {
    if rules.is_empty() {
        return 0;
    }

    let before = parts.len();
    parts.retain(|_, part| {
        let blocked = is_blacklisted(part, group, rules);
        if blocked {
            debug!("Blacklisted part in {}: {}", group, part.subject);
        }
        !blocked
    });
    before - parts.len()
}
