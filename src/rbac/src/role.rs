//! Role definition
//!
//! A role owns its directly-assigned permissions behind its own lock. It knows
//! nothing about parents or children; inheritance edges live in the
//! [`Registry`](crate::Registry).

use crate::permission::Permission;
use crate::types::{Identifier, PermissionId, RoleId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Named principal holding a set of directly-assigned permissions
pub struct Role<R = RoleId, P = PermissionId> {
    /// Unique role identifier
    id: R,

    /// Assigned permissions keyed by permission ID
    permissions: RwLock<HashMap<P, Permission<P>>>,
}

impl<R: Identifier, P: Identifier> Role<R, P> {
    /// Create a role with no permissions
    pub fn new(id: R) -> Self {
        Self {
            id,
            permissions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a role with an initial set of permissions
    pub fn with_permissions(id: R, permissions: impl IntoIterator<Item = Permission<P>>) -> Self {
        let permissions = permissions
            .into_iter()
            .map(|p| (p.id().clone(), p))
            .collect();

        Self {
            id,
            permissions: RwLock::new(permissions),
        }
    }

    /// Role identifier
    pub fn id(&self) -> &R {
        &self.id
    }

    /// Assign a permission, replacing any permission with the same ID
    pub fn assign(&self, permission: Permission<P>) {
        self.permissions
            .write()
            .insert(permission.id().clone(), permission);
    }

    /// Revoke a permission by ID
    ///
    /// Returns whether a permission was removed. Revoking an absent
    /// permission is a no-op.
    pub fn revoke(&self, id: &P) -> bool {
        self.permissions.write().remove(id).is_some()
    }

    /// Returns true if any assigned permission matches `permission`
    pub fn permit(&self, permission: &Permission<P>) -> bool {
        self.permissions
            .read()
            .values()
            .any(|assigned| assigned.matches(permission))
    }

    /// Snapshot of the assigned permissions, unordered
    pub fn permissions(&self) -> Vec<Permission<P>> {
        self.permissions.read().values().cloned().collect()
    }

    /// Number of assigned permissions
    pub fn len(&self) -> usize {
        self.permissions.read().len()
    }

    /// Returns true if no permissions are assigned
    pub fn is_empty(&self) -> bool {
        self.permissions.read().is_empty()
    }
}

impl<R: fmt::Debug, P: fmt::Debug> fmt::Debug for Role<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("id", &self.id)
            .field("permissions", &self.permissions.read().len())
            .finish()
    }
}
