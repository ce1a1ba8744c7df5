//! Ownership predicate registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

/// Predicate deciding whether a principal owns a concrete resource.
pub type OwnershipPredicate = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Per-resource-type ownership checks.
///
/// A resource type without a registered predicate is never "own"; the
/// grant lookup falls back to `any` possession.
#[derive(Default, Clone)]
pub struct OwnershipResolver {
    predicates: HashMap<String, OwnershipPredicate>,
}

impl OwnershipResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, resource_type: impl Into<String>, predicate: F)
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.predicates
            .insert(resource_type.into(), Arc::new(predicate));
    }

    pub fn is_owner(&self, resource_type: &str, principal: &Value, resource: &Value) -> bool {
        self.predicates
            .get(resource_type)
            .is_some_and(|predicate| predicate(principal, resource))
    }
}
