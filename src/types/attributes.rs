//! Deduplicated attribute pattern sets.

use std::collections::HashSet;

use itertools::Itertools;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::pattern::{AttributePattern, PathPattern};

/// The set of attribute patterns attached to a decision.
///
/// Patterns are deduplicated. `*` collapses every other inclusion while
/// exclusions survive: `{*, *, pages, type, !authors}` normalizes to
/// `{*, !authors}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    patterns: HashSet<AttributePattern>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full-visibility set, `{*}`.
    pub fn all() -> Self {
        let mut set = Self::new();
        set.insert(AttributePattern::All);
        set
    }

    pub fn insert(&mut self, pattern: AttributePattern) {
        self.patterns.insert(pattern);
    }

    /// Union another set into this one.
    pub fn merge(&mut self, other: &AttributeSet) {
        for pattern in &other.patterns {
            self.patterns.insert(pattern.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when `*` is present.
    pub fn contains_all(&self) -> bool {
        self.patterns.contains(&AttributePattern::All)
    }

    pub fn has_exclusions(&self) -> bool {
        self.patterns
            .iter()
            .any(|p| matches!(p, AttributePattern::Exclude(_)))
    }

    /// Drop inclusions made redundant by `*`.
    pub fn normalize(&mut self) {
        if self.contains_all() {
            self.patterns
                .retain(|p| !matches!(p, AttributePattern::Include(_)));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributePattern> {
        self.patterns.iter()
    }

    pub(crate) fn includes(&self) -> impl Iterator<Item = &PathPattern> {
        self.patterns.iter().filter_map(|p| match p {
            AttributePattern::Include(path) => Some(path),
            _ => None,
        })
    }

    pub(crate) fn excludes(&self) -> impl Iterator<Item = &PathPattern> {
        self.patterns.iter().filter_map(|p| match p {
            AttributePattern::Exclude(path) => Some(path),
            _ => None,
        })
    }

    /// Canonical token list, sorted for stable output.
    pub fn tokens(&self) -> Vec<String> {
        self.patterns.iter().map(ToString::to_string).sorted().collect()
    }
}

impl FromIterator<AttributePattern> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = AttributePattern>>(iter: I) -> Self {
        AttributeSet {
            patterns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for AttributeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.tokens())
    }
}

impl<'de> Deserialize<'de> for AttributeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tokens = Vec::<String>::deserialize(deserializer)?;
        let mut set = AttributeSet::new();
        for token in tokens {
            match token.parse::<AttributePattern>() {
                Ok(pattern) => set.insert(pattern),
                Err(_) => warn!(
                    event = "AttributeSet",
                    phase = "Deserialize",
                    pattern = token,
                    "skipping malformed attribute pattern"
                ),
            }
        }
        Ok(set)
    }
}
