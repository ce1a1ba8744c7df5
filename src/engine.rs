use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use serde_json::Value;
use tracing::debug;

use crate::error::AccessError;
use crate::grants::{GrantTable, MemoryGrantStore};
use crate::ownership::OwnershipResolver;
use crate::resolver::PermissionResolver;
use crate::rules::RuleEngine;
use crate::traits::RoleGrantStore;
use crate::types::{Action, ActionSelector, AttributeSet, Decision};

/// Maps a principal to the roles it holds.
pub type RolesFn = Box<dyn Fn(&Value) -> Vec<String> + Send + Sync>;

/// Construction options for [`AccessEngine`].
///
/// `roles_of` is the one required piece of configuration; ownership
/// predicates and the inheritance map are optional.
pub struct EngineOptions {
    roles_of: RolesFn,
    ownership: OwnershipResolver,
    inheritance: HashMap<String, Vec<String>>,
}

impl EngineOptions {
    pub fn new<F>(roles_of: F) -> Self
    where
        F: Fn(&Value) -> Vec<String> + Send + Sync + 'static,
    {
        EngineOptions {
            roles_of: Box::new(roles_of),
            ownership: OwnershipResolver::new(),
            inheritance: HashMap::new(),
        }
    }

    /// Register an ownership predicate for `resource_type`.
    pub fn with_ownership<F>(mut self, resource_type: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.ownership.register(resource_type, predicate);
        self
    }

    /// Inheritance map applied when the engine is built.
    pub fn with_inheritance(mut self, inheritance: HashMap<String, Vec<String>>) -> Self {
        self.inheritance = inheritance;
        self
    }
}

/// The main engine handle.
///
/// Owns the rule chains, the ownership predicates, and the grant store.
/// Registration (`add_rule`, `add_role_inheritance`) takes `&mut self` and
/// belongs to the configuration phase; queries take `&self` and are pure
/// reads, safe to issue concurrently once configuration is done.
pub struct AccessEngine {
    grants: Box<dyn RoleGrantStore>,
    rules: RuleEngine,
    ownership: OwnershipResolver,
    roles_of: RolesFn,
}

impl AccessEngine {
    /// Build an engine over the boundary grant table.
    pub fn new(table: GrantTable, options: EngineOptions) -> Result<Self, AccessError> {
        let store = MemoryGrantStore::from_table(table)?;
        Self::with_store(Box::new(store), options)
    }

    /// Build an engine over any [`RoleGrantStore`] implementation.
    pub fn with_store(
        mut grants: Box<dyn RoleGrantStore>,
        options: EngineOptions,
    ) -> Result<Self, AccessError> {
        let EngineOptions {
            roles_of,
            ownership,
            inheritance,
        } = options;
        for (super_role, sub_roles) in &inheritance {
            grants.extend(super_role, sub_roles)?;
        }
        Ok(AccessEngine {
            grants,
            rules: RuleEngine::new(),
            ownership,
            roles_of,
        })
    }

    /// Query surface for one principal.
    pub fn can<'a>(&'a self, principal: &'a Value) -> AccessQuery<'a> {
        AccessQuery {
            engine: self,
            principal,
        }
    }

    /// Append a custom rule to the chain for the selected action(s) on
    /// `resource_type`. A registered chain fully determines decisions for
    /// its key; role grants are no longer consulted.
    pub fn add_rule<F>(
        &mut self,
        selector: impl Into<ActionSelector>,
        resource_type: &str,
        rule: F,
    ) where
        F: Fn(&Value, &Value) -> Result<bool, AccessError> + Send + Sync + 'static,
    {
        self.rules.add(selector.into(), resource_type, Arc::new(rule));
    }

    /// Extend roles with the effective grants of other roles. Idempotent
    /// under repeated calls with the same map; cycles are rejected.
    pub fn add_role_inheritance(
        &mut self,
        inheritance: HashMap<String, Vec<String>>,
    ) -> Result<(), AccessError> {
        for (super_role, sub_roles) in &inheritance {
            self.grants.extend(super_role, sub_roles)?;
        }
        Ok(())
    }

    fn evaluate(
        &self,
        principal: &Value,
        resource: &Value,
        resource_type: &str,
        action: Action,
    ) -> Result<Decision, AccessError> {
        let roles: Vec<String> = (self.roles_of)(principal).into_iter().unique().collect();

        debug!(
            event = "Query",
            phase = "Roles",
            action = action.to_string(),
            resource_type,
            roles = roles.join(",")
        );

        if let Some(granted) = self
            .rules
            .evaluate(action, resource_type, principal, resource)?
        {
            debug!(
                event = "Query",
                phase = "Rules",
                action = action.to_string(),
                resource_type,
                granted
            );
            let attributes = if granted {
                AttributeSet::all()
            } else {
                AttributeSet::new()
            };
            return Ok(Decision::new(action, resource_type, roles, attributes));
        }

        let is_owner = self.ownership.is_owner(resource_type, principal, resource);
        let (attributes, granted) =
            PermissionResolver::new(self.grants.as_ref()).resolve(&roles, action, resource_type, is_owner);

        debug!(
            event = "Query",
            phase = "Grants",
            action = action.to_string(),
            resource_type,
            owner = is_owner,
            granted
        );

        Ok(Decision::new(action, resource_type, roles, attributes))
    }
}

/// Per-principal query handle returned by [`AccessEngine::can`].
pub struct AccessQuery<'a> {
    engine: &'a AccessEngine,
    principal: &'a Value,
}

impl AccessQuery<'_> {
    pub fn create(&self, resource: &Value, resource_type: &str) -> Result<Decision, AccessError> {
        self.engine
            .evaluate(self.principal, resource, resource_type, Action::Create)
    }

    pub fn read(&self, resource: &Value, resource_type: &str) -> Result<Decision, AccessError> {
        self.engine
            .evaluate(self.principal, resource, resource_type, Action::Read)
    }

    pub fn update(&self, resource: &Value, resource_type: &str) -> Result<Decision, AccessError> {
        self.engine
            .evaluate(self.principal, resource, resource_type, Action::Update)
    }

    pub fn delete(&self, resource: &Value, resource_type: &str) -> Result<Decision, AccessError> {
        self.engine
            .evaluate(self.principal, resource, resource_type, Action::Delete)
    }
}

#[cfg(test)]
mod tests;
