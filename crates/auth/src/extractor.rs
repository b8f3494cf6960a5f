//! Claims principal → [`AuthenticatedUser`] extraction.
//!
//! Everything here operates on attacker-influenced data: claim values arrive
//! from the network. No path may panic or return an error for bad claim
//! content; incomplete identities resolve to `false`/`None`.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::{AuthenticatedUser, ClaimMapping, ClaimsPrincipal, MalformedClaimData, RoleSet};

/// Turns a claims principal into a trustworthy identity, or rejects it.
///
/// Implementations must be synchronous and side-effect free with respect to
/// the principal. One that resolves extra data (e.g. group lookups) owns its
/// own caching and staleness policy.
pub trait ClaimsExtractor: Send + Sync {
    /// True iff the principal is authenticated and carries a subject id and
    /// an email.
    fn is_valid_principal(&self, principal: &ClaimsPrincipal) -> bool;

    /// `None` whenever [`ClaimsExtractor::is_valid_principal`] is false.
    fn extract_from_principal(&self, principal: &ClaimsPrincipal) -> Option<AuthenticatedUser>;
}

/// Extractor driven by a [`ClaimMapping`].
#[derive(Debug, Clone)]
pub struct StandardClaimsExtractor {
    mapping: ClaimMapping,
    excluded: HashSet<String>,
}

impl StandardClaimsExtractor {
    pub fn new(mapping: ClaimMapping) -> Self {
        let excluded = mapping.excluded_claim_types();
        Self { mapping, excluded }
    }

    pub fn keycloak() -> Self {
        Self::new(ClaimMapping::keycloak())
    }

    pub fn saml() -> Self {
        Self::new(ClaimMapping::saml())
    }

    pub fn mapping(&self) -> &ClaimMapping {
        &self.mapping
    }

    /// First non-blank value of `claim_type`.
    fn required_value<'a>(principal: &'a ClaimsPrincipal, claim_type: &str) -> Option<&'a str> {
        principal
            .find_first(claim_type)
            .filter(|v| !v.trim().is_empty())
    }

    fn display_name(&self, principal: &ClaimsPrincipal) -> Option<String> {
        principal
            .find_first(&self.mapping.name)
            .or_else(|| {
                self.mapping
                    .username_fallback
                    .as_deref()
                    .and_then(|t| principal.find_first(t))
            })
            .map(str::to_string)
    }

    fn extract_roles(&self, principal: &ClaimsPrincipal) -> RoleSet {
        let flat = principal.find_all(&self.mapping.role).map(str::to_string);

        let nested = match self
            .mapping
            .nested_roles
            .as_deref()
            .and_then(|t| principal.find_first(t).map(|v| (t, v)))
        {
            Some((claim_type, raw)) => match parse_nested_roles(raw) {
                Ok(roles) => roles,
                Err(reason) => {
                    tracing::debug!(claim_type, %reason, "ignoring nested role claim");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        flat.chain(nested).collect()
    }

    fn extract_custom_claims(&self, principal: &ClaimsPrincipal) -> BTreeMap<String, String> {
        let mut custom = BTreeMap::new();
        for claim in principal.claims() {
            if self.excluded.contains(&claim.claim_type) {
                continue;
            }
            custom
                .entry(claim.claim_type.clone())
                .or_insert_with(|| claim.value.clone());
        }
        custom
    }
}

impl Default for StandardClaimsExtractor {
    fn default() -> Self {
        Self::keycloak()
    }
}

impl ClaimsExtractor for StandardClaimsExtractor {
    fn is_valid_principal(&self, principal: &ClaimsPrincipal) -> bool {
        principal.is_authenticated()
            && Self::required_value(principal, &self.mapping.subject).is_some()
            && Self::required_value(principal, &self.mapping.email).is_some()
    }

    fn extract_from_principal(&self, principal: &ClaimsPrincipal) -> Option<AuthenticatedUser> {
        if !self.is_valid_principal(principal) {
            return None;
        }

        let id = Self::required_value(principal, &self.mapping.subject)?;
        let email = Self::required_value(principal, &self.mapping.email)?;

        AuthenticatedUser::new(
            id,
            email,
            self.display_name(principal),
            self.extract_roles(principal),
            self.extract_custom_claims(principal),
        )
        .ok()
    }
}

/// Parse a container claim value of the shape `{"roles": ["a", "b"]}`.
///
/// The `roles` key is matched case-insensitively. A missing or `null` `roles`
/// entry yields an empty list and `null` elements are skipped; any other
/// shape is malformed.
pub fn parse_nested_roles(raw: &str) -> Result<Vec<String>, MalformedClaimData> {
    let value: Value = serde_json::from_str(raw).map_err(|_| MalformedClaimData::NotJson)?;
    let Value::Object(object) = value else {
        return Err(MalformedClaimData::NotAnObject);
    };

    let roles = object
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("roles"))
        .map(|(_, v)| v);

    match roles {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(Ok(s)),
                Value::Null => None,
                _ => Some(Err(MalformedClaimData::RolesNotStrings)),
            })
            .collect(),
        Some(_) => Err(MalformedClaimData::RolesNotStrings),
    }
}
