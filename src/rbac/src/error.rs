//! Error types for the RBAC engine

use thiserror::Error;

/// RBAC engine errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RbacError {
    /// Role (or a referenced parent/child role) is not registered
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// A role with the same ID is already registered
    #[error("Role already exists: {0}")]
    RoleAlreadyExists(String),

    /// A parent-edge path returns to a role already on that path
    #[error("Cycle detected from role '{root}': {}", .path.join(" -> "))]
    CycleDetected {
        /// DFS root the cycle was reached from
        root: String,
        /// The cyclic chain, first and last entries are the same role
        path: Vec<String>,
    },
}

impl RbacError {
    pub(crate) fn role_not_found(id: impl std::fmt::Display) -> Self {
        Self::RoleNotFound(id.to_string())
    }

    pub(crate) fn role_already_exists(id: impl std::fmt::Display) -> Self {
        Self::RoleAlreadyExists(id.to_string())
    }
}

/// Result type for RBAC operations
pub type Result<T> = std::result::Result<T, RbacError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = RbacError::CycleDetected {
            root: "a".to_string(),
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };

        assert_eq!(err.to_string(), "Cycle detected from role 'a': a -> b -> a");
    }

    #[test]
    fn test_display_ids() {
        assert_eq!(
            RbacError::role_not_found(42u32).to_string(),
            "Role not found: 42"
        );
        assert_eq!(
            RbacError::role_already_exists("admin").to_string(),
            "Role already exists: admin"
        );
    }
}
