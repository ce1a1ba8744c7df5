//! Custom rule chains.
//!
//! A chain, once registered for an (action, resource type) key, fully
//! determines the decision for that key: rules run in registration order,
//! any `Err` aborts the evaluation immediately, and the outcome is granted
//! iff at least one rule returned `true`. No chain means "no opinion" and
//! role resolution decides instead.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use strum::IntoEnumIterator;

use crate::error::AccessError;
use crate::types::{Action, ActionSelector};

/// A registered rule: approve with `Ok(true)`, abstain with `Ok(false)`,
/// veto the whole evaluation with `Err`.
pub type CustomRule = Arc<dyn Fn(&Value, &Value) -> Result<bool, AccessError> + Send + Sync>;

#[derive(Default)]
pub struct RuleEngine {
    chains: HashMap<Action, HashMap<String, Vec<CustomRule>>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rule` to the chain for every selected action. Registration
    /// belongs to the configuration phase, before queries begin.
    pub fn add(&mut self, selector: ActionSelector, resource_type: &str, rule: CustomRule) {
        match selector {
            ActionSelector::One(action) => self.push(action, resource_type, rule),
            ActionSelector::All => {
                for action in Action::iter() {
                    self.push(action, resource_type, Arc::clone(&rule));
                }
            }
        }
    }

    fn push(&mut self, action: Action, resource_type: &str, rule: CustomRule) {
        self.chains
            .entry(action)
            .or_default()
            .entry(resource_type.to_string())
            .or_default()
            .push(rule);
    }

    /// Run the chain for `(action, resource_type)`.
    ///
    /// `Ok(None)` means no chain is registered. Every rule in the chain is
    /// consulted so that a later veto still aborts after an earlier
    /// approval.
    pub fn evaluate(
        &self,
        action: Action,
        resource_type: &str,
        principal: &Value,
        resource: &Value,
    ) -> Result<Option<bool>, AccessError> {
        let Some(chain) = self
            .chains
            .get(&action)
            .and_then(|per_type| per_type.get(resource_type))
        else {
            return Ok(None);
        };
        let mut granted = false;
        for rule in chain {
            if rule(principal, resource)? {
                granted = true;
            }
        }
        Ok(Some(granted))
    }
}
