//! Path pattern grammar and matching
//!
//! Exactly three pattern forms are accepted:
//!
//! - an exact path: `/api/v1/users`
//! - a prefix wildcard: `/api/**`, matching `/api` itself and everything
//!   under `/api/`
//! - segment wildcards combined with a prefix wildcard: `/tenant-*/**`,
//!   where each `*` completes a single path segment and never crosses a
//!   `/` boundary
//!
//! Anything else is rejected when the pattern is parsed, so a policy can
//! never carry a pattern with surprise semantics.

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A parsed path pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathPattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    /// Byte-for-byte equality with the full path
    Exact,
    /// The subtree rooted at a literal prefix ("" for the bare `/**`)
    Prefix(String),
    /// Head segments that may each carry one `*`, then the subtree rule
    Segments(Vec<HeadSegment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HeadSegment {
    Literal(String),
    /// One `*` inside the segment; prefix and suffix are the literal parts
    Wildcard { prefix: String, suffix: String },
}

impl PathPattern {
    /// Test whether `path` matches this pattern
    pub fn matches(&self, path: &str) -> bool {
        match &self.kind {
            PatternKind::Exact => self.raw == path,
            PatternKind::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
            PatternKind::Segments(head) => {
                let mut segments = path.strip_prefix('/').unwrap_or(path).split('/');
                for expected in head {
                    let Some(segment) = segments.next() else {
                        return false;
                    };
                    let ok = match expected {
                        HeadSegment::Literal(lit) => segment == lit,
                        HeadSegment::Wildcard { prefix, suffix } => {
                            segment.len() >= prefix.len() + suffix.len()
                                && segment.starts_with(prefix.as_str())
                                && segment.ends_with(suffix.as_str())
                        }
                    };
                    if !ok {
                        return false;
                    }
                }
                // The trailing `**` covers the rest, including nothing at all.
                true
            }
        }
    }

    /// Length of the literal prefix before the first wildcard
    ///
    /// Used as the specificity tie-break when two policies share a
    /// priority: `/admin/public/**` beats `/admin/**`.
    pub fn literal_prefix_len(&self) -> usize {
        match self.raw.find('*') {
            Some(idx) => idx,
            None => self.raw.len(),
        }
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for PathPattern {
    type Err = GatewayError;

    fn from_str(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(GatewayError::validation("path pattern must not be empty"));
        }
        if !raw.starts_with('/') {
            return Err(GatewayError::validation(format!(
                "path pattern must start with '/': {raw}"
            )));
        }

        if !raw.contains('*') {
            return Ok(Self {
                raw: raw.to_string(),
                kind: PatternKind::Exact,
            });
        }

        let Some(head) = raw.strip_suffix("/**") else {
            return Err(GatewayError::validation(format!(
                "wildcard pattern must end with '/**': {raw}"
            )));
        };

        if head.ends_with('/') || head.contains("//") {
            return Err(GatewayError::validation(format!(
                "path pattern has an empty segment: {raw}"
            )));
        }

        if !head.contains('*') {
            return Ok(Self {
                raw: raw.to_string(),
                kind: PatternKind::Prefix(head.to_string()),
            });
        }

        let mut segments = Vec::new();
        for segment in head.strip_prefix('/').unwrap_or(head).split('/') {
            match segment.matches('*').count() {
                0 => segments.push(HeadSegment::Literal(segment.to_string())),
                1 => {
                    let star = segment.find('*').unwrap_or_default();
                    segments.push(HeadSegment::Wildcard {
                        prefix: segment[..star].to_string(),
                        suffix: segment[star + 1..].to_string(),
                    });
                }
                _ => {
                    return Err(GatewayError::validation(format!(
                        "at most one '*' per segment: {raw}"
                    )));
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            kind: PatternKind::Segments(segments),
        })
    }
}

impl TryFrom<String> for PathPattern {
    type Error = GatewayError;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

impl From<PathPattern> for String {
    fn from(pattern: PathPattern) -> Self {
        pattern.raw
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
