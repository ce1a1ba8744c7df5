//! Action vocabulary for authorization queries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::AccessError;

/// One of the four actions a principal can be asked about.
///
/// The set is closed: there is no dynamic action registration, and every
/// component dispatches on these variants explicitly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Target of a rule registration: a single action, or all four (`"*"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSelector {
    All,
    One(Action),
}

impl From<Action> for ActionSelector {
    fn from(action: Action) -> Self {
        ActionSelector::One(action)
    }
}

impl FromStr for ActionSelector {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(ActionSelector::All);
        }
        Action::from_str(s).map(ActionSelector::One).map_err(|_| {
            AccessError::InvalidFormat(format!(
                "unknown action selector '{s}' (expected 'create', 'read', 'update', 'delete' or '*')"
            ))
        })
    }
}
