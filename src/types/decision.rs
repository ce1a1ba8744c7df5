//! Authorization decision records.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::filter;

use super::action::Action;
use super::attributes::AttributeSet;

/// The immutable outcome of one authorization query.
///
/// A decision is granted exactly when at least one attribute pattern was
/// resolved for it; the constructor derives `granted` so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Decision {
    action: Action,
    resource_type: String,
    roles: Vec<String>,
    granted: bool,
    #[schema(value_type = Vec<String>)]
    attributes: AttributeSet,
}

impl Decision {
    pub(crate) fn new(
        action: Action,
        resource_type: impl Into<String>,
        roles: Vec<String>,
        mut attributes: AttributeSet,
    ) -> Self {
        attributes.normalize();
        Decision {
            action,
            resource_type: resource_type.into(),
            roles,
            granted: !attributes.is_empty(),
            attributes,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The roles the principal held when the query was evaluated.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn granted(&self) -> bool {
        self.granted
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Project `data` down to the attributes this decision exposes.
    ///
    /// A denied decision yields an empty container of the data's top-level
    /// shape; `{*}` with no exclusions returns the data unchanged.
    pub fn filter(&self, data: &Value) -> Value {
        filter::apply(&self.attributes, data)
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.granted {
            write!(
                f,
                "Grant({} {} [{}])",
                self.action,
                self.resource_type,
                self.attributes.tokens().join(", ")
            )
        } else {
            write!(f, "Deny({} {})", self.action, self.resource_type)
        }
    }
}
