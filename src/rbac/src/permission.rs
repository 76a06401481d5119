//! Permission definitions and matching
//!
//! A permission is compared with [`Permission::matches`] rather than raw
//! equality. Simple permissions match only their own ID. Layered permissions
//! treat their ID as a path of segments joined by a separator, and match
//! anything equal to or beneath them:
//!
//! ```
//! use cretoai_rbac::Permission;
//!
//! let admin = Permission::layered("admin".to_string(), "::");
//! let dashboard = Permission::layered("admin::dashboard".to_string(), "::");
//!
//! assert!(admin.matches(&dashboard));
//! assert!(!dashboard.matches(&admin));
//! ```

use crate::types::{Identifier, PermissionId};
use serde::{Deserialize, Serialize};

/// Authorizable capability identified by an ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Permission<P = PermissionId> {
    /// Matches only an equal ID
    Simple {
        /// Permission identifier
        id: P,
    },

    /// Matches an equal ID or any layered permission beneath it
    Layered {
        /// Permission identifier (e.g. `"admin::dashboard"`)
        id: P,
        /// Segment separator (e.g. `"::"`)
        separator: String,
    },
}

impl<P: Identifier> Permission<P> {
    /// Create a simple permission
    pub fn new(id: P) -> Self {
        Self::Simple { id }
    }

    /// Create a layered permission split on `separator`
    pub fn layered(id: P, separator: impl Into<String>) -> Self {
        Self::Layered {
            id,
            separator: separator.into(),
        }
    }

    /// Permission identifier
    pub fn id(&self) -> &P {
        match self {
            Self::Simple { id } | Self::Layered { id, .. } => id,
        }
    }

    /// Separator of a layered permission
    pub fn separator(&self) -> Option<&str> {
        match self {
            Self::Simple { .. } => None,
            Self::Layered { separator, .. } => Some(separator),
        }
    }

    /// Returns whether this is a layered permission
    pub fn is_layered(&self) -> bool {
        matches!(self, Self::Layered { .. })
    }

    /// Split the ID into its segments
    ///
    /// A simple permission is a single segment. A layered permission with an
    /// empty separator splits into its characters.
    pub fn segments(&self) -> Vec<String> {
        let path = self.id().as_path();
        match self.separator() {
            Some(sep) => split_path(&path, sep).into_iter().map(str::to_owned).collect(),
            None => vec![path.into_owned()],
        }
    }

    /// Returns true if holding `self` grants `other`
    ///
    /// Equal IDs always match. Beyond that, a layered permission matches a
    /// layered `other` when its segments are a segment-wise prefix of
    /// `other`'s segments. Each side splits on its own separator. Not
    /// symmetric: `admin` matches `admin::dashboard`, not the reverse.
    pub fn matches(&self, other: &Permission<P>) -> bool {
        if self.id() == other.id() {
            return true;
        }

        let (
            Self::Layered { id, separator },
            Self::Layered {
                id: other_id,
                separator: other_sep,
            },
        ) = (self, other)
        else {
            return false;
        };

        let path = id.as_path();
        let other_path = other_id.as_path();
        let prefix = split_path(&path, separator);
        let target = split_path(&other_path, other_sep);

        if prefix.len() > target.len() {
            return false;
        }

        prefix.iter().zip(target.iter()).all(|(a, b)| a == b)
    }
}

/// Split a path on `separator`; an empty separator yields one segment per char
fn split_path<'a>(path: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        path.char_indices()
            .map(|(i, c)| &path[i..i + c.len_utf8()])
            .collect()
    } else {
        path.split(separator).collect()
    }
}
