//! Request-layer entry point for authentication/authorization questions.

use std::sync::Arc;

use crate::{
    AuthError, AuthResult, AuthenticatedUser, AuthenticationPolicy, ClaimsExtractor,
    ClaimsPrincipal, PolicyRegistry, StandardClaimsExtractor,
};

/// Answers "is this caller allowed" for the request layer.
///
/// Two failure modes are kept apart:
/// - a bad *argument* from calling code (absent role list, unknown policy
///   name) is returned as an [`AuthError`];
/// - bad *claim data* from the network never errors and resolves to
///   `false`/`None`.
///
/// Pure and synchronous. Safe to share across threads; the registry is never
/// mutated after construction.
#[derive(Clone)]
pub struct AuthorizationEvaluator {
    extractor: Arc<dyn ClaimsExtractor>,
    policies: Arc<PolicyRegistry>,
}

impl core::fmt::Debug for AuthorizationEvaluator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthorizationEvaluator")
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

impl AuthorizationEvaluator {
    pub fn new(extractor: Arc<dyn ClaimsExtractor>, policies: Arc<PolicyRegistry>) -> Self {
        Self {
            extractor,
            policies,
        }
    }

    /// Keycloak claim mapping with the standard policy table.
    pub fn keycloak() -> Self {
        Self::new(
            Arc::new(StandardClaimsExtractor::keycloak()),
            Arc::new(PolicyRegistry::standard()),
        )
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    pub fn is_authenticated(&self, principal: &ClaimsPrincipal) -> bool {
        self.extractor.is_valid_principal(principal)
    }

    pub fn get_authenticated_user(&self, principal: &ClaimsPrincipal) -> Option<AuthenticatedUser> {
        self.extractor.extract_from_principal(principal)
    }

    pub fn authorize_user(&self, user: &AuthenticatedUser, policy: &AuthenticationPolicy) -> bool {
        let allowed = policy.is_satisfied_by(user);
        if !allowed {
            tracing::debug!(policy = policy.name(), "policy not satisfied");
        }
        allowed
    }

    /// ANY-of role check without a named policy.
    ///
    /// - `Some(&[])`: allowed. No specific role is needed, so any extracted
    ///   (hence authenticated) user passes, matching a policy with no
    ///   required roles.
    /// - `None`: the caller failed to supply a role list; returns
    ///   [`AuthError::InvalidArgument`].
    pub fn authorize_by_roles<S: AsRef<str>>(
        &self,
        user: &AuthenticatedUser,
        required_roles: Option<&[S]>,
    ) -> AuthResult<bool> {
        let required_roles = required_roles
            .ok_or_else(|| AuthError::invalid_argument("required_roles must be provided"))?;
        Ok(roles_satisfied(user, required_roles))
    }

    /// Extract then authorize. An invalid principal is denied, never an error.
    pub fn authorize(&self, principal: &ClaimsPrincipal, policy: &AuthenticationPolicy) -> bool {
        match self.get_authenticated_user(principal) {
            Some(user) => self.authorize_user(&user, policy),
            None => {
                tracing::debug!(policy = policy.name(), "denied: no authenticated user");
                false
            }
        }
    }

    /// Extract then check roles. The role list is validated before the
    /// principal is looked at, so an absent list is reported even for an
    /// anonymous principal.
    pub fn authorize_principal_by_roles<S: AsRef<str>>(
        &self,
        principal: &ClaimsPrincipal,
        required_roles: Option<&[S]>,
    ) -> AuthResult<bool> {
        let required_roles = required_roles
            .ok_or_else(|| AuthError::invalid_argument("required_roles must be provided"))?;
        Ok(self
            .get_authenticated_user(principal)
            .is_some_and(|user| roles_satisfied(&user, required_roles)))
    }

    /// Authorize against a policy from the registry.
    ///
    /// An unknown policy name is a configuration bug and is returned as
    /// [`AuthError::UnknownPolicy`]; an invalid principal is `Ok(false)`.
    pub fn authorize_named(
        &self,
        principal: &ClaimsPrincipal,
        policy_name: &str,
    ) -> AuthResult<bool> {
        let policy = self.policies.require(policy_name)?;
        Ok(self.authorize(principal, policy))
    }
}

fn roles_satisfied<S: AsRef<str>>(user: &AuthenticatedUser, required_roles: &[S]) -> bool {
    required_roles.is_empty() || user.has_any_role(required_roles)
}
