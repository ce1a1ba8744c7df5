//! In-memory role grant store.
//!
//! The boundary table shape is a compatibility contract:
//! `role → resource type → "<action>:<possession>" → [attribute pattern]`,
//! typically deserialized straight from JSON configuration. Malformed
//! attribute patterns are skipped with a warning; a malformed grant key
//! fails construction.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use tracing::warn;

use crate::error::AccessError;
use crate::traits::RoleGrantStore;
use crate::types::{Action, AttributePattern, AttributeSet, Possession};

/// Nested grant configuration in the boundary format.
pub type GrantTable = HashMap<String, HashMap<String, HashMap<String, Vec<String>>>>;

type GrantKey = (Action, Possession);

/// Grant store backed by an in-memory table plus an eagerly-closed role
/// inheritance graph.
#[derive(Debug, Default)]
pub struct MemoryGrantStore {
    direct: HashMap<String, HashMap<String, HashMap<GrantKey, AttributeSet>>>,
    /// Direct inheritance edges, super-role → sub-roles.
    extends: BTreeMap<String, BTreeSet<String>>,
    /// Transitive closure of `extends`, recomputed on every registration.
    reachable: HashMap<String, BTreeSet<String>>,
}

impl MemoryGrantStore {
    pub fn from_table(table: GrantTable) -> Result<Self, AccessError> {
        let mut direct = HashMap::new();
        for (role, resources) in table {
            let mut per_resource = HashMap::new();
            for (resource_type, grants) in resources {
                let mut per_key: HashMap<GrantKey, AttributeSet> = HashMap::new();
                for (key, tokens) in grants {
                    let grant_key = parse_grant_key(&key)?;
                    let set = per_key.entry(grant_key).or_default();
                    for token in tokens {
                        match token.parse::<AttributePattern>() {
                            Ok(pattern) => set.insert(pattern),
                            Err(_) => warn!(
                                event = "GrantTable",
                                phase = "Load",
                                role = role.as_str(),
                                resource_type = resource_type.as_str(),
                                pattern = token,
                                "skipping malformed attribute pattern"
                            ),
                        }
                    }
                }
                per_resource.insert(resource_type, per_key);
            }
            direct.insert(role, per_resource);
        }
        Ok(MemoryGrantStore {
            direct,
            ..Default::default()
        })
    }

    fn merge_direct(
        &self,
        into: &mut AttributeSet,
        role: &str,
        resource_type: &str,
        action: Action,
        possession: Possession,
    ) {
        let Some(per_key) = self
            .direct
            .get(role)
            .and_then(|resources| resources.get(resource_type))
        else {
            return;
        };
        if let Some(set) = per_key.get(&(action, possession)) {
            into.merge(set);
        }
        // An `any` grant subsumes `own` queries for the same action.
        if possession == Possession::Own {
            if let Some(set) = per_key.get(&(action, Possession::Any)) {
                into.merge(set);
            }
        }
    }

    fn recompute_closure(&mut self) -> Result<(), AccessError> {
        fn visit(
            role: &str,
            extends: &BTreeMap<String, BTreeSet<String>>,
            done: &mut HashMap<String, BTreeSet<String>>,
            visiting: &mut BTreeSet<String>,
        ) -> Result<BTreeSet<String>, AccessError> {
            if let Some(cached) = done.get(role) {
                return Ok(cached.clone());
            }
            if !visiting.insert(role.to_string()) {
                return Err(AccessError::InheritanceCycle(role.to_string()));
            }
            let mut reach = BTreeSet::new();
            if let Some(subs) = extends.get(role) {
                for sub in subs {
                    reach.insert(sub.clone());
                    reach.extend(visit(sub, extends, done, visiting)?);
                }
            }
            visiting.remove(role);
            done.insert(role.to_string(), reach.clone());
            Ok(reach)
        }

        let mut done = HashMap::new();
        let mut visiting = BTreeSet::new();
        for role in self.extends.keys() {
            visit(role, &self.extends, &mut done, &mut visiting)?;
        }
        self.reachable = done;
        Ok(())
    }
}

impl RoleGrantStore for MemoryGrantStore {
    fn granted_attributes(
        &self,
        role: &str,
        resource_type: &str,
        action: Action,
        possession: Possession,
    ) -> AttributeSet {
        let mut merged = AttributeSet::new();
        self.merge_direct(&mut merged, role, resource_type, action, possession);
        if let Some(subs) = self.reachable.get(role) {
            for sub in subs {
                self.merge_direct(&mut merged, sub, resource_type, action, possession);
            }
        }
        merged
    }

    fn extend(&mut self, super_role: &str, sub_roles: &[String]) -> Result<(), AccessError> {
        self.extends
            .entry(super_role.to_string())
            .or_default()
            .extend(sub_roles.iter().cloned());
        self.recompute_closure()
    }
}

fn parse_grant_key(key: &str) -> Result<GrantKey, AccessError> {
    let Some((action, possession)) = key.split_once(':') else {
        return Err(AccessError::InvalidGrantKey(key.to_string()));
    };
    let action = Action::from_str(action)
        .map_err(|_| AccessError::InvalidGrantKey(key.to_string()))?;
    let possession = Possession::from_str(possession)
        .map_err(|_| AccessError::InvalidGrantKey(key.to_string()))?;
    Ok((action, possession))
}
