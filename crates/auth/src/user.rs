//! Per-request identity snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{AuthError, AuthResult, RoleSet};

/// Identity extracted from the current request's claims principal.
///
/// # Invariants
/// - `id` and `email` are non-blank.
/// - `roles` is fixed at construction; membership is case-insensitive.
/// - `custom_claims` holds at most one value per claim type.
///
/// Built fresh for every authorization check and never cached, so decisions
/// always reflect the token that is being presented right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    id: String,
    email: String,
    name: Option<String>,
    roles: RoleSet,
    custom_claims: BTreeMap<String, String>,
}

impl AuthenticatedUser {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: Option<String>,
        roles: RoleSet,
        custom_claims: BTreeMap<String, String>,
    ) -> AuthResult<Self> {
        let id = id.into();
        let email = email.into();
        if id.trim().is_empty() {
            return Err(AuthError::invalid_argument("user id must not be empty"));
        }
        if email.trim().is_empty() {
            return Err(AuthError::invalid_argument("user email must not be empty"));
        }
        Ok(Self {
            id,
            email,
            name,
            roles,
            custom_claims,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn custom_claims(&self) -> &BTreeMap<String, String> {
        &self.custom_claims
    }

    pub fn custom_claim(&self, claim_type: &str) -> Option<&str> {
        self.custom_claims.get(claim_type).map(String::as_str)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.roles.contains_any(roles)
    }

    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.roles.contains_all(roles)
    }
}
