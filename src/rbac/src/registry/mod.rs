//! RBAC registry: role storage and the parent-edge graph
//!
//! The registry owns every registered role and a map from each role to the set
//! of its parent roles. A role inherits every grant of every ancestor reachable
//! over parent edges.
//!
//! # Locking
//!
//! One reader/writer lock guards the role map and the edge map together.
//! Structural mutations (`add`, `remove`, `set_parents`, `remove_parent`) take
//! it exclusively. Queries (`get`, `get_parents`, grant resolution, cycle
//! checks, snapshots) take it shared for their whole duration, so a traversal
//! never observes a half-applied mutation.
//!
//! Grant resolution reads individual roles' permission sets while holding the
//! registry lock. The order is always registry first, then role. `Role` holds
//! no reference back to the registry, and role permission reads only happen
//! inside graph methods reachable through a registry guard.
//!
//! # Acyclicity
//!
//! The graph is expected to stay acyclic, but `set_parents` does not reject
//! edges that close a cycle. Callers validate with
//! [`Registry::check_cycles`] after changing edges.
//!
//! # Example
//!
//! ```
//! use cretoai_rbac::{Permission, Registry, Role};
//!
//! # fn main() -> cretoai_rbac::Result<()> {
//! let registry: Registry = Registry::new();
//!
//! let editor = Role::new("editor".to_string());
//! editor.assign(Permission::new("docs:edit".to_string()));
//!
//! registry.add(editor)?;
//! registry.add(Role::new("author".to_string()))?;
//! registry.set_parents(&"author".to_string(), ["editor".to_string()])?;
//!
//! assert!(registry.is_granted(&"author".to_string(), &Permission::new("docs:edit".to_string())));
//! registry.check_cycles()?;
//! # Ok(())
//! # }
//! ```

mod cycle;
mod resolver;


use crate::error::{RbacError, Result};
use crate::role::Role;
use crate::types::{Identifier, PermissionId, RoleId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Initial capacity of the role and edge maps
    pub initial_capacity: usize,

    /// Maximum number of parent edges grant resolution follows from the
    /// starting role (`None` searches every ancestor)
    pub max_depth: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            max_depth: None,
        }
    }
}

/// Role map and parent-edge map, guarded as one unit by the registry lock
pub(crate) struct RoleGraph<R, P> {
    /// Registered roles by ID
    pub(crate) roles: HashMap<R, Arc<Role<R, P>>>,

    /// Parent role IDs by child role ID
    pub(crate) parents: HashMap<R, HashSet<R>>,
}

impl<R: Identifier, P: Identifier> RoleGraph<R, P> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            roles: HashMap::with_capacity(capacity),
            parents: HashMap::with_capacity(capacity),
        }
    }

    fn require(&self, id: &R) -> Result<&Arc<Role<R, P>>> {
        self.roles.get(id).ok_or_else(|| RbacError::role_not_found(id))
    }

    pub(crate) fn insert_role(&mut self, role: Arc<Role<R, P>>) -> Result<()> {
        if self.roles.contains_key(role.id()) {
            return Err(RbacError::role_already_exists(role.id()));
        }
        self.roles.insert(role.id().clone(), role);
        Ok(())
    }

    pub(crate) fn insert_parents(&mut self, id: &R, parents: Vec<R>) -> Result<()> {
        self.require(id)?;
        for parent in &parents {
            self.require(parent)?;
        }

        if parents.is_empty() {
            return Ok(());
        }

        self.parents.entry(id.clone()).or_default().extend(parents);
        Ok(())
    }

    fn parent_snapshot(&self, id: &R) -> HashSet<R> {
        self.parents.get(id).cloned().unwrap_or_default()
    }
}

/// Role graph with inheritance-aware grant resolution
pub struct Registry<R = RoleId, P = PermissionId> {
    pub(crate) graph: RwLock<RoleGraph<R, P>>,
    config: RegistryConfig,
}

impl<R: Identifier, P: Identifier> Registry<R, P> {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            graph: RwLock::new(RoleGraph::with_capacity(config.initial_capacity)),
            config,
        }
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a role under its ID
    ///
    /// # Errors
    ///
    /// Returns `RoleAlreadyExists` if a role with the same ID is registered.
    /// The registry is left unchanged.
    pub fn add(&self, role: impl Into<Arc<Role<R, P>>>) -> Result<()> {
        let role = role.into();
        let id = role.id().clone();

        self.graph.write().insert_role(role)?;
        debug!("Role added: {}", id);
        Ok(())
    }

    /// Remove a role and every parent edge that mentions it
    ///
    /// Deletes the role's own parent set and removes `id` from the parent set
    /// of every other role. Returns the removed role.
    ///
    /// # Errors
    ///
    /// Returns `RoleNotFound` if the role is not registered.
    pub fn remove(&self, id: &R) -> Result<Arc<Role<R, P>>> {
        let mut graph = self.graph.write();

        let role = graph
            .roles
            .remove(id)
            .ok_or_else(|| RbacError::role_not_found(id))?;

        graph.parents.remove(id);
        let mut purged = 0usize;
        for parents in graph.parents.values_mut() {
            if parents.remove(id) {
                purged += 1;
            }
        }

        debug!("Role removed: {} ({} child edges purged)", id, purged);
        Ok(role)
    }

    /// Add parent edges from `id` to each of `parents`
    ///
    /// Edges are merged into the existing parent set. Every referenced role is
    /// checked before any edge is applied, so a failure leaves the graph
    /// untouched.
    ///
    /// Cycles are not rejected here; see [`Registry::check_cycles`].
    ///
    /// # Errors
    ///
    /// Returns `RoleNotFound` if `id` or any parent is not registered.
    pub fn set_parents(&self, id: &R, parents: impl IntoIterator<Item = R>) -> Result<()> {
        let parents: Vec<R> = parents.into_iter().collect();
        let count = parents.len();

        self.graph.write().insert_parents(id, parents)?;
        debug!("Parents set for role {}: {} edges merged", id, count);
        Ok(())
    }

    /// Remove the edge from `id` to `parent`
    ///
    /// Removing an edge that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RoleNotFound` if either role is not registered.
    pub fn remove_parent(&self, id: &R, parent: &R) -> Result<()> {
        let mut graph = self.graph.write();
        graph.require(id)?;
        graph.require(parent)?;

        let removed = graph
            .parents
            .get_mut(id)
            .is_some_and(|parents| parents.remove(parent));

        if removed {
            debug!("Parent {} removed from role {}", parent, id);
        }
        Ok(())
    }

    /// Snapshot of the parent IDs of `id` (empty if it has none)
    ///
    /// # Errors
    ///
    /// Returns `RoleNotFound` if the role is not registered.
    pub fn get_parents(&self, id: &R) -> Result<HashSet<R>> {
        let graph = self.graph.read();
        graph.require(id)?;
        Ok(graph.parent_snapshot(id))
    }

    /// Role handle and a snapshot of its parent IDs
    ///
    /// # Errors
    ///
    /// Returns `RoleNotFound` if the role is not registered.
    pub fn get(&self, id: &R) -> Result<(Arc<Role<R, P>>, HashSet<R>)> {
        let graph = self.graph.read();
        let role = Arc::clone(graph.require(id)?);
        Ok((role, graph.parent_snapshot(id)))
    }

    /// Returns true if a role with `id` is registered
    pub fn contains(&self, id: &R) -> bool {
        self.graph.read().roles.contains_key(id)
    }

    /// IDs of every registered role, unordered
    pub fn role_ids(&self) -> Vec<R> {
        self.graph.read().roles.keys().cloned().collect()
    }

    /// Number of registered roles
    pub fn len(&self) -> usize {
        self.graph.read().roles.len()
    }

    /// Returns true if no roles are registered
    pub fn is_empty(&self) -> bool {
        self.graph.read().roles.is_empty()
    }
}

impl<R: Identifier, P: Identifier> Default for Registry<R, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Identifier, P: Identifier> fmt::Debug for Registry<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph.read();
        let edges: usize = graph.parents.values().map(HashSet::len).sum();

        f.debug_struct("Registry")
            .field("roles", &graph.roles.len())
            .field("edges", &edges)
            .field("config", &self.config)
            .finish()
    }
}
