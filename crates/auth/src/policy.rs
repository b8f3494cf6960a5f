use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::roles::fold;
use crate::{AuthError, AuthResult, AuthenticatedUser, Role};

/// Standard policy names.
pub mod names {
    pub const AUTHENTICATED: &str = "Authenticated";
    pub const ADMIN_ONLY: &str = "AdminOnly";
    pub const USER_ACCESS: &str = "UserAccess";
}

/// A named authorization rule.
///
/// Satisfied when the user holds ANY of `required_roles` (case-insensitive).
/// An empty list means "authenticated only".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationPolicy {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    required_roles: Vec<Role>,
}

impl AuthenticationPolicy {
    pub fn new<I, R>(
        name: impl Into<String>,
        description: Option<String>,
        required_roles: I,
    ) -> AuthResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuthError::invalid_argument("policy name must not be empty"));
        }
        Ok(Self {
            name,
            description,
            required_roles: required_roles.into_iter().map(Into::into).collect(),
        })
    }

    /// Policy satisfied by any authenticated user.
    pub fn authenticated_only() -> Self {
        Self::builtin(names::AUTHENTICATED, "Requires authentication", &[])
    }

    pub fn admin_only() -> Self {
        Self::builtin(names::ADMIN_ONLY, "Requires admin role", &["admin"])
    }

    pub fn user_access() -> Self {
        Self::builtin(
            names::USER_ACCESS,
            "Requires admin or user role",
            &["admin", "user"],
        )
    }

    /// Policy named `role:<role>` satisfied by that single role.
    pub fn requires_role(role: impl Into<Role>) -> Self {
        let role = role.into();
        Self {
            name: format!("role:{role}"),
            description: Some(format!("Requires {role} role")),
            required_roles: vec![role],
        }
    }

    fn builtin(name: &str, description: &str, roles: &[&'static str]) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            required_roles: roles.iter().map(|r| Role::new(*r)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn required_roles(&self) -> &[Role] {
        &self.required_roles
    }

    pub fn is_satisfied_by(&self, user: &AuthenticatedUser) -> bool {
        if self.required_roles.is_empty() {
            return true;
        }
        self.required_roles.iter().any(|r| user.has_role(r.as_str()))
    }
}

/// Immutable table of named policies, built once at startup.
///
/// Names are unique case-insensitively; lookups ignore case.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: Vec<AuthenticationPolicy>,
    index: HashMap<String, usize>,
}

impl PolicyRegistry {
    pub fn new(policies: impl IntoIterator<Item = AuthenticationPolicy>) -> AuthResult<Self> {
        let mut registry = Self::default();
        for policy in policies {
            if policy.name().trim().is_empty() {
                return Err(AuthError::invalid_argument("policy name must not be empty"));
            }
            let key = fold(policy.name());
            if registry.index.contains_key(&key) {
                return Err(AuthError::DuplicatePolicy(policy.name().to_string()));
            }
            registry.index.insert(key, registry.policies.len());
            registry.policies.push(policy);
        }
        Ok(registry)
    }

    /// `Authenticated`, `AdminOnly` and `UserAccess`.
    pub fn standard() -> Self {
        let policies = vec![
            AuthenticationPolicy::authenticated_only(),
            AuthenticationPolicy::admin_only(),
            AuthenticationPolicy::user_access(),
        ];
        let index = policies
            .iter()
            .enumerate()
            .map(|(i, p)| (fold(p.name()), i))
            .collect();
        Self { policies, index }
    }

    pub fn get(&self, name: &str) -> Option<&AuthenticationPolicy> {
        self.index.get(&fold(name)).map(|&i| &self.policies[i])
    }

    pub fn require(&self, name: &str) -> AuthResult<&AuthenticationPolicy> {
        self.get(name).ok_or_else(|| AuthError::unknown_policy(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthenticationPolicy> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
