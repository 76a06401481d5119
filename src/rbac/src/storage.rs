//! Persistence collaborator contract
//!
//! The engine never calls a store. Adapters implement [`Storage`] to convert
//! domain entities into storable models, save them and fetch them back by ID,
//! working from the snapshots the registry hands out.

use crate::error::{RbacError, Result};
use crate::role::Role;
use crate::snapshot::RoleRecord;
use crate::types::{Identifier, PermissionId, RoleId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Storage backend for entities of type `T` stored as models `M` keyed by `K`
pub trait Storage<T, M, K>: Send + Sync {
    /// Error reported by the backend
    type Error;

    /// Convert an entity into its storable model
    fn convert(&self, entity: &T) -> std::result::Result<M, Self::Error>;

    /// Persist a model, replacing any model with the same key
    fn save(&self, model: M) -> std::result::Result<(), Self::Error>;

    /// Fetch models by key, in request order
    fn get_by(&self, ids: &[K]) -> std::result::Result<Vec<M>, Self::Error>;
}

/// In-memory role store
pub struct MemoryStorage<R = RoleId, P = PermissionId> {
    records: RwLock<HashMap<R, RoleRecord<R, P>>>,
}

impl<R: Identifier, P: Identifier> MemoryStorage<R, P> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<R: Identifier, P: Identifier> Default for MemoryStorage<R, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Identifier, P: Identifier> Storage<Role<R, P>, RoleRecord<R, P>, R>
    for MemoryStorage<R, P>
{
    type Error = RbacError;

    fn convert(&self, entity: &Role<R, P>) -> Result<RoleRecord<R, P>> {
        Ok(RoleRecord::from(entity))
    }

    fn save(&self, model: RoleRecord<R, P>) -> Result<()> {
        self.records.write().insert(model.id.clone(), model);
        Ok(())
    }

    fn get_by(&self, ids: &[R]) -> Result<Vec<RoleRecord<R, P>>> {
        let records = self.records.read();
        ids.iter()
            .map(|id| {
                records
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RbacError::role_not_found(id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::Permission;
    use crate::registry::Registry;

    #[test]
    fn test_save_and_fetch_in_order() {
        let store: MemoryStorage = MemoryStorage::new();

        for id in ["a", "b", "c"] {
            let role =
                Role::with_permissions(id.to_string(), vec![Permission::new(format!("p-{}", id))]);
            let record = store.convert(&role).unwrap();
            store.save(record).unwrap();
        }

        let fetched = store.get_by(&["c".to_string(), "a".to_string()]).unwrap();
        let ids: Vec<&str> = fetched.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let store: MemoryStorage = MemoryStorage::new();
        let err = store.get_by(&["nobody".to_string()]).unwrap_err();
        assert_eq!(err, RbacError::RoleNotFound("nobody".to_string()));
    }

    #[test]
    fn test_store_registry_snapshot() {
        let registry: Registry = Registry::new();
        registry
            .add(Role::with_permissions(
                "ops".to_string(),
                vec![Permission::new("deploy".to_string())],
            ))
            .unwrap();

        let store: MemoryStorage = MemoryStorage::new();
        for record in registry.snapshot().roles {
            store.save(record).unwrap();
        }

        let restored = store.get_by(&["ops".to_string()]).unwrap();
        let role = restored.into_iter().next().unwrap().into_role();
        assert!(role.permit(&Permission::new("deploy".to_string())));
    }
}
