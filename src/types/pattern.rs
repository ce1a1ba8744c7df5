//! Attribute pattern tokens.
//!
//! Three forms exist:
//! - `*` — every attribute; overrides all other inclusions.
//! - `title`, `address.id`, `pages.*.number` — include the dotted path.
//!   A `*` segment matches every key of an object or every index of an
//!   array at that level.
//! - `!author` — exclude the dotted path from the included view.
//!
//! Patterns are case-sensitive. The empty string, or a path with an empty
//! segment (`a..b`), is malformed.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::AccessError;

/// One path segment of an attribute pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Literal object key; also matches the array index it parses to.
    Key(String),
    /// `*`: every key or index at this level.
    Any,
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Any => write!(f, "*"),
        }
    }
}

/// A dotted path with optional `*` segments, e.g. `pages.*.number`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromStr for PathPattern {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AccessError::InvalidPattern(s.to_string()));
        }
        let segments = s
            .split('.')
            .map(|segment| match segment {
                "" => Err(AccessError::InvalidPattern(s.to_string())),
                "*" => Ok(Segment::Any),
                key => Ok(Segment::Key(key.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PathPattern { segments })
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

/// A single parsed attribute pattern token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributePattern {
    /// `*`: all attributes.
    All,
    /// Include the matched path.
    Include(PathPattern),
    /// `!path`: remove the matched path from the included view.
    Exclude(PathPattern),
}

impl FromStr for AttributePattern {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(AttributePattern::All);
        }
        match s.strip_prefix('!') {
            Some(path) => path.parse().map(AttributePattern::Exclude),
            None => s.parse().map(AttributePattern::Include),
        }
    }
}

impl Display for AttributePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AttributePattern::All => write!(f, "*"),
            AttributePattern::Include(path) => write!(f, "{path}"),
            AttributePattern::Exclude(path) => write!(f, "!{path}"),
        }
    }
}
