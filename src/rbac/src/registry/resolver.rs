//! Grant resolution over the parent-edge graph
//!
//! A role is granted a permission if the role itself, or any ancestor reachable
//! over parent edges, holds a permission that matches it. The search is an
//! iterative breadth-first walk with a visited set scoped to one top-level
//! query:
//!
//! - diamond ancestries visit the shared ancestor once
//! - an undetected cycle ends the walk instead of recursing forever
//! - deep hierarchies cannot exhaust the thread stack
//!
//! The visited set is not a substitute for [`Registry::check_cycles`]; cycles
//! are still reported only by the explicit check.

use super::{Registry, RoleGraph};
use crate::permission::Permission;
use crate::types::Identifier;
use std::collections::{HashSet, VecDeque};
use tracing::{trace, warn};

impl<R: Identifier, P: Identifier> RoleGraph<R, P> {
    /// Search `id` and its ancestors for a role permitting `permission`
    ///
    /// Must be called with the registry lock held; individual role locks are
    /// taken inside `Role::permit`.
    pub(super) fn resolve(
        &self,
        id: &R,
        permission: &Permission<P>,
        max_depth: Option<usize>,
    ) -> bool {
        if !self.roles.contains_key(id) {
            trace!("Unknown role {} cannot be granted {}", id, permission.id());
            return false;
        }

        let mut visited: HashSet<&R> = HashSet::new();
        let mut queue: VecDeque<(&R, usize)> = VecDeque::new();
        let mut truncated = false;

        visited.insert(id);
        queue.push_back((id, 0));

        while let Some((current, depth)) = queue.pop_front() {
            // Parent IDs without a registered role are skipped
            let Some(role) = self.roles.get(current) else {
                continue;
            };

            if role.permit(permission) {
                trace!("Role {} granted {} via {} (depth {})", id, permission.id(), current, depth);
                return true;
            }

            let Some(parents) = self.parents.get(current) else {
                continue;
            };

            if max_depth.is_some_and(|max| depth >= max) {
                truncated |= !parents.is_empty();
                continue;
            }

            for parent in parents {
                if visited.insert(parent) {
                    queue.push_back((parent, depth + 1));
                }
            }
        }

        if truncated {
            warn!(
                "Grant resolution for role {} stopped at max depth {:?} without finding {}",
                id,
                max_depth,
                permission.id()
            );
        }

        false
    }
}

impl<R: Identifier, P: Identifier> Registry<R, P> {
    /// Returns true if `id` or any of its ancestors holds a permission
    /// matching `permission`
    ///
    /// Unknown roles are never granted anything. The registry lock is held
    /// shared for the entire search.
    pub fn is_granted(&self, id: &R, permission: &Permission<P>) -> bool {
        self.graph.read().resolve(id, permission, self.config.max_depth)
    }

    /// Like [`Registry::is_granted`], with a veto predicate
    ///
    /// `assertion` is called once with the registry, the role ID and the
    /// permission before the graph is searched. If it returns false the result
    /// is false. It runs before the registry lock is taken, so it may query the
    /// registry itself.
    pub fn is_granted_with<F>(&self, id: &R, permission: &Permission<P>, assertion: F) -> bool
    where
        F: FnOnce(&Self, &R, &Permission<P>) -> bool,
    {
        if !assertion(self, id, permission) {
            trace!("Assertion vetoed {} for role {}", permission.id(), id);
            return false;
        }
        self.is_granted(id, permission)
    }

    /// Returns true if at least one of `roles` is granted `permission`
    ///
    /// Stops at the first granted role. An empty list is never granted.
    pub fn any_granted(&self, roles: &[R], permission: &Permission<P>) -> bool {
        let graph = self.graph.read();
        roles
            .iter()
            .any(|id| graph.resolve(id, permission, self.config.max_depth))
    }

    /// Returns true if every one of `roles` is granted `permission`
    ///
    /// Stops at the first role that is not granted. An empty list is
    /// vacuously granted.
    pub fn all_granted(&self, roles: &[R], permission: &Permission<P>) -> bool {
        let graph = self.graph.read();
        roles
            .iter()
            .all(|id| graph.resolve(id, permission, self.config.max_depth))
    }
}
