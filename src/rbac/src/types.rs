//! Core identifier types

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Default role identifier
pub type RoleId = String;

/// Default permission identifier
pub type PermissionId = String;

/// Key type for roles and permissions
///
/// Identifiers need total equality and hashing for map lookups, a `Display`
/// form for errors and logs, and a path form that layered permissions split
/// on their separator.
pub trait Identifier: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// String path of this identifier (e.g. `"admin::dashboard"`)
    fn as_path(&self) -> Cow<'_, str>;
}

impl Identifier for String {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl Identifier for &'static str {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Borrowed(*self)
    }
}

impl Identifier for Arc<str> {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&**self)
    }
}

impl Identifier for Box<str> {
    fn as_path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&**self)
    }
}

macro_rules! numeric_identifier {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identifier for $ty {
                fn as_path(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

numeric_identifier!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
