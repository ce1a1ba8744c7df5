//! Own/any possession marker.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Whether a grant applies to resources the principal owns, or to any
/// instance of the resource type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Possession {
    Own,
    Any,
}

impl Possession {
    /// The possession implied by an ownership check.
    pub fn from_owner(is_owner: bool) -> Self {
        if is_owner {
            Possession::Own
        } else {
            Possession::Any
        }
    }
}
