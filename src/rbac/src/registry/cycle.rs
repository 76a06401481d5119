//! On-demand cycle detection over parent edges
//!
//! Every registered role is a DFS root. The walk follows parent edges and keeps
//! the current path; reaching a role already on the path is a cycle. Roles
//! whose ancestry has been fully explored are marked done and skipped by later
//! roots, since a fully explored ancestry contains no cycle. The first cycle
//! found aborts the check.
//!
//! The walk uses an explicit stack of parent iterators rather than recursion.

use super::{Registry, RoleGraph};
use crate::error::{RbacError, Result};
use crate::types::Identifier;
use std::collections::HashMap;
use tracing::{debug, warn};

/// DFS visit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current path
    Visiting,
    /// Ancestry fully explored
    Done,
}

impl<R: Identifier, P: Identifier> RoleGraph<R, P> {
    fn parents_of<'a>(&'a self, id: &R) -> impl Iterator<Item = &'a R> + 'a {
        self.parents.get(id).into_iter().flatten()
    }

    /// Find the first cycle reachable from any role
    ///
    /// Returns the DFS root and the cyclic chain, which starts and ends with
    /// the same role.
    pub(super) fn find_cycle(&self) -> Option<(&R, Vec<&R>)> {
        let mut marks: HashMap<&R, Mark> = HashMap::with_capacity(self.roles.len());

        for root in self.roles.keys() {
            if marks.contains_key(root) {
                continue;
            }

            marks.insert(root, Mark::Visiting);
            let mut path: Vec<&R> = vec![root];
            let mut frames = vec![self.parents_of(root)];

            loop {
                let Some(frame) = frames.last_mut() else {
                    break;
                };

                let next = frame.next();
                match next {
                    Some(parent) => match marks.get(parent).copied() {
                        Some(Mark::Visiting) => {
                            let start = path.iter().position(|id| *id == parent).unwrap_or(0);
                            let mut cycle = path[start..].to_vec();
                            cycle.push(parent);
                            return Some((root, cycle));
                        }
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(parent, Mark::Visiting);
                            path.push(parent);
                            frames.push(self.parents_of(parent));
                        }
                    },
                    None => {
                        frames.pop();
                        if let Some(done) = path.pop() {
                            marks.insert(done, Mark::Done);
                        }
                    }
                }
            }
        }

        None
    }
}

impl<R: Identifier, P: Identifier> Registry<R, P> {
    /// Validate that the parent-edge graph is acyclic
    ///
    /// Runs under the shared registry lock. Acyclicity is not enforced by
    /// [`Registry::set_parents`]; run this after edge changes and remove an
    /// edge to recover.
    ///
    /// # Errors
    ///
    /// Returns `CycleDetected` with the offending root and the cyclic path for
    /// the first cycle found.
    pub fn check_cycles(&self) -> Result<()> {
        let graph = self.graph.read();

        match graph.find_cycle() {
            Some((root, cycle)) => {
                let path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
                warn!("Cycle detected from role {}: {}", root, path.join(" -> "));
                Err(RbacError::CycleDetected {
                    root: root.to_string(),
                    path,
                })
            }
            None => {
                debug!("Cycle check passed for {} roles", graph.roles.len());
                Ok(())
            }
        }
    }
}
