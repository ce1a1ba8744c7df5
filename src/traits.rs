use crate::error::AccessError;
use crate::types::{Action, AttributeSet, Possession};

/// Source of role→attribute grants.
///
/// The engine only reads through this trait at query time. `extend` belongs
/// to the configuration phase: it establishes that a role's effective
/// grants include those of the listed sub-roles, transitively, for every
/// (resource type, action, possession) key.
pub trait RoleGrantStore: Send + Sync {
    /// The attribute patterns granted to `role` for this lookup key.
    ///
    /// Unknown roles and resource types yield the empty set, never an
    /// error.
    fn granted_attributes(
        &self,
        role: &str,
        resource_type: &str,
        action: Action,
        possession: Possession,
    ) -> AttributeSet;

    /// Make `super_role` inherit the effective grants of `sub_roles`.
    fn extend(&mut self, super_role: &str, sub_roles: &[String]) -> Result<(), AccessError>;
}
