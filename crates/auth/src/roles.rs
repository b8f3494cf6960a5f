use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};

/// Role identifier used for RBAC.
///
/// Roles are opaque capability labels. Equality by `==` is exact; use a
/// [`RoleSet`] for the case-insensitive comparison that authorization
/// decisions rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Normalized key used for case-insensitive role identity.
pub(crate) fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// An immutable, case-insensitively deduplicated set of roles.
///
/// Iteration yields roles in first-seen order with their first-seen casing.
/// Two sets are equal when they hold the same roles ignoring case and order.
#[derive(Debug, Clone, Default)]
pub struct RoleSet {
    roles: Vec<Role>,
    keys: HashSet<String>,
}

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from role names, skipping blank entries and later
    /// case-variants of a name already present.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name.into());
        }
        set
    }

    fn insert(&mut self, name: String) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.keys.insert(fold(trimmed)) {
            self.roles.push(Role::new(trimmed.to_string()));
        }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.keys.contains(&fold(role.trim()))
    }

    pub fn contains_any<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.contains(r.as_ref()))
    }

    pub fn contains_all<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().all(|r| self.contains(r.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }
}

impl PartialEq for RoleSet {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl Eq for RoleSet {}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a Role;
    type IntoIter = core::slice::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.iter()
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.roles.iter())
    }
}
