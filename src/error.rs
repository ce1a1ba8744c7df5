use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize)]
pub enum AccessError {
    /// A custom rule refused the evaluation outright. This is the only
    /// error a caller sees per query; everything else is configuration.
    #[error("rule veto: {0}")]
    RuleVeto(String),

    #[error("role inheritance cycle involving '{0}'")]
    InheritanceCycle(String),

    #[error("invalid grant key '{0}': expected '<action>:<possession>'")]
    InvalidGrantKey(String),

    #[error("invalid attribute pattern '{0}'")]
    InvalidPattern(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl AccessError {
    /// Shorthand for vetoing from inside a custom rule.
    pub fn veto(reason: impl Into<String>) -> Self {
        AccessError::RuleVeto(reason.into())
    }
}
