//! Plain-data snapshots of roles and the registry
//!
//! Snapshots are what a persistence collaborator stores. They are detached
//! copies: mutating the registry afterwards does not change a snapshot, and
//! restoring builds a fresh registry.

use crate::error::Result;
use crate::permission::Permission;
use crate::registry::{Registry, RegistryConfig, RoleGraph};
use crate::role::Role;
use crate::types::{Identifier, PermissionId, RoleId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Storable form of a role and its directly-assigned permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord<R = RoleId, P = PermissionId> {
    /// Role identifier
    pub id: R,

    /// Directly-assigned permissions, unordered
    pub permissions: Vec<Permission<P>>,
}

impl<R: Identifier, P: Identifier> RoleRecord<R, P> {
    /// Build a role from this record
    pub fn into_role(self) -> Role<R, P> {
        Role::with_permissions(self.id, self.permissions)
    }
}

impl<R: Identifier, P: Identifier> From<&Role<R, P>> for RoleRecord<R, P> {
    fn from(role: &Role<R, P>) -> Self {
        Self {
            id: role.id().clone(),
            permissions: role.permissions(),
        }
    }
}

/// Directed inheritance edge: `child` inherits the grants of `parent`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentEdge<R = RoleId> {
    /// Inheriting role
    pub child: R,

    /// Role inherited from
    pub parent: R,
}

/// Every role and every parent edge of a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot<R = RoleId, P = PermissionId> {
    /// Registered roles, unordered
    pub roles: Vec<RoleRecord<R, P>>,

    /// Parent edges, unordered
    pub edges: Vec<ParentEdge<R>>,
}

impl<R: Identifier, P: Identifier> Registry<R, P> {
    /// Detached copy of every role and edge
    ///
    /// Takes the registry lock shared, then each role's lock in turn.
    pub fn snapshot(&self) -> RegistrySnapshot<R, P> {
        let graph = self.graph.read();

        let roles = graph
            .roles
            .values()
            .map(|role| RoleRecord::from(&**role))
            .collect();

        let edges = graph
            .parents
            .iter()
            .flat_map(|(child, parents)| {
                parents.iter().map(move |parent| ParentEdge {
                    child: child.clone(),
                    parent: parent.clone(),
                })
            })
            .collect();

        RegistrySnapshot { roles, edges }
    }

    /// Build a registry from a snapshot with default configuration
    ///
    /// # Errors
    ///
    /// Returns `RoleAlreadyExists` if the snapshot lists a role twice and
    /// `RoleNotFound` if an edge references a role the snapshot does not
    /// contain.
    pub fn from_snapshot(snapshot: RegistrySnapshot<R, P>) -> Result<Self> {
        Self::from_snapshot_with_config(snapshot, RegistryConfig::default())
    }

    /// Build a registry from a snapshot with custom configuration
    pub fn from_snapshot_with_config(
        snapshot: RegistrySnapshot<R, P>,
        config: RegistryConfig,
    ) -> Result<Self> {
        let capacity = config.initial_capacity.max(snapshot.roles.len());
        let mut graph = RoleGraph::with_capacity(capacity);

        let role_count = snapshot.roles.len();
        for record in snapshot.roles {
            graph.insert_role(Arc::new(record.into_role()))?;
        }

        let edge_count = snapshot.edges.len();
        for edge in snapshot.edges {
            graph.insert_parents(&edge.child, vec![edge.parent])?;
        }

        debug!("Registry restored: {} roles, {} edges", role_count, edge_count);

        let registry = Self::with_config(config);
        *registry.graph.write() = graph;
        Ok(registry)
    }
}
