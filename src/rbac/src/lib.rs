//! # CretoAI RBAC Engine
//!
//! Role/permission graph engine: roles own permissions, inherit from any
//! number of parent roles, and grants are resolved across the whole ancestry.
//!
//! ## Features
//!
//! - **Layered permissions** matching by path segment (`admin` grants `admin::dashboard`)
//! - **Multi-parent inheritance** with union-of-ancestors grant resolution
//! - **On-demand cycle validation** reporting the cyclic path
//! - **Thread-safe** role and registry locks with a fixed registry-then-role order
//! - **Snapshots** and a storage contract for external persistence
//!
//! ## Example
//!
//! ```rust
//! use cretoai_rbac::{Permission, Registry, Role};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry: Registry = Registry::new();
//!
//!     let admin = Role::new("admin".to_string());
//!     admin.assign(Permission::layered("admin".to_string(), "::"));
//!     registry.add(admin)?;
//!
//!     registry.add(Role::new("root".to_string()))?;
//!     registry.set_parents(&"root".to_string(), ["admin".to_string()])?;
//!
//!     let dashboard = Permission::layered("admin::dashboard".to_string(), "::");
//!     assert!(registry.is_granted(&"root".to_string(), &dashboard));
//!
//!     registry.check_cycles()?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod permission;
pub mod registry;
pub mod role;
pub mod snapshot;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{RbacError, Result};
pub use permission::Permission;
pub use registry::{Registry, RegistryConfig};
pub use role::Role;
pub use snapshot::{ParentEdge, RegistrySnapshot, RoleRecord};
pub use storage::{MemoryStorage, Storage};
pub use types::{Identifier, PermissionId, RoleId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
