use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Claim types used by OIDC/JWT providers (Keycloak naming).
pub mod jwt {
    pub const SUBJECT: &str = "sub";
    pub const EMAIL: &str = "email";
    pub const NAME: &str = "name";
    pub const PREFERRED_USERNAME: &str = "preferred_username";
    pub const ROLE: &str = "role";
    pub const REALM_ACCESS: &str = "realm_access";
}

/// Claim-type URIs emitted by SAML 2.0 / WS-Federation assertion consumers.
pub mod saml {
    pub const NAME_IDENTIFIER: &str =
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
    pub const EMAIL: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
    pub const NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
    pub const ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
}

/// Registered token claims that never count as custom claims.
pub const REGISTERED_CLAIMS: &[&str] = &[
    "iss", "aud", "sub", "iat", "exp", "nbf", "jti", "typ", "scope", "azp",
];

/// Which claim types carry which part of an identity for one provider.
///
/// The exclusion set for custom claims is derived from this mapping plus
/// [`REGISTERED_CLAIMS`] and `extra_excluded`; nothing else is excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMapping {
    pub subject: String,
    pub email: String,
    pub name: String,
    pub username_fallback: Option<String>,
    pub role: String,
    /// Claim whose value is a JSON object with a `roles` string array.
    pub nested_roles: Option<String>,
    #[serde(default)]
    pub extra_excluded: Vec<String>,
}

impl ClaimMapping {
    /// Keycloak-issued access tokens: flat `role` claims plus `realm_access`.
    pub fn keycloak() -> Self {
        Self {
            subject: jwt::SUBJECT.to_string(),
            email: jwt::EMAIL.to_string(),
            name: jwt::NAME.to_string(),
            username_fallback: Some(jwt::PREFERRED_USERNAME.to_string()),
            role: jwt::ROLE.to_string(),
            nested_roles: Some(jwt::REALM_ACCESS.to_string()),
            extra_excluded: Vec::new(),
        }
    }

    /// SAML assertions: URI claim types, flat roles only.
    pub fn saml() -> Self {
        Self {
            subject: saml::NAME_IDENTIFIER.to_string(),
            email: saml::EMAIL.to_string(),
            name: saml::NAME.to_string(),
            username_fallback: None,
            role: saml::ROLE.to_string(),
            nested_roles: None,
            extra_excluded: vec!["nonce".to_string()],
        }
    }

    /// Look up a preset by name (`keycloak` or `saml`).
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "keycloak" | "jwt" | "oidc" => Some(Self::keycloak()),
            "saml" => Some(Self::saml()),
            _ => None,
        }
    }

    /// The closed set of claim types excluded from custom claims.
    pub fn excluded_claim_types(&self) -> HashSet<String> {
        let mut excluded: HashSet<String> = [&self.subject, &self.email, &self.name, &self.role]
            .into_iter()
            .cloned()
            .collect();
        excluded.extend(self.username_fallback.iter().cloned());
        excluded.extend(self.nested_roles.iter().cloned());
        excluded.extend(REGISTERED_CLAIMS.iter().map(|c| c.to_string()));
        excluded.extend(self.extra_excluded.iter().cloned());
        excluded
    }
}

impl Default for ClaimMapping {
    fn default() -> Self {
        Self::keycloak()
    }
}
