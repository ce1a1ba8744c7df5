//! Role-based permission resolution.

use crate::traits::RoleGrantStore;
use crate::types::{Action, AttributeSet, Possession};

/// Unions grant-store lookups across every role a principal holds.
pub struct PermissionResolver<'a> {
    grants: &'a dyn RoleGrantStore,
}

impl<'a> PermissionResolver<'a> {
    pub fn new(grants: &'a dyn RoleGrantStore) -> Self {
        PermissionResolver { grants }
    }

    /// Merge the grants of `roles` for one lookup key.
    ///
    /// Duplicate roles are harmless; the result is a set. Granted iff the
    /// merged set is non-empty.
    pub fn resolve(
        &self,
        roles: &[String],
        action: Action,
        resource_type: &str,
        is_owner: bool,
    ) -> (AttributeSet, bool) {
        let possession = Possession::from_owner(is_owner);
        let mut merged = AttributeSet::new();
        for role in roles {
            merged.merge(&self.grants.granted_attributes(role, resource_type, action, possession));
        }
        merged.normalize();
        let granted = !merged.is_empty();
        (merged, granted)
    }
}
