//! Host configuration: identity provider settings and the policy table.
//!
//! Loaded once at startup. The resulting [`PolicyRegistry`] is immutable and
//! shared read-only by every evaluation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

use claimguard_auth::{
    AuthenticationPolicy, AuthorizationEvaluator, ClaimMapping, PolicyRegistry,
    StandardClaimsExtractor,
};

pub const ENV_IDP_URL: &str = "CLAIMGUARD_IDP_URL";
pub const ENV_REALM: &str = "CLAIMGUARD_REALM";

/// Identity provider the upstream middleware authenticates against.
///
/// Informational for this process; tokens are verified upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProviderConfig {
    pub base_url: Option<String>,
    pub realm: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingConfig {
    /// A preset name: `keycloak` or `saml`.
    Preset(String),
    Custom(ClaimMapping),
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::Preset("keycloak".to_string())
    }
}

impl MappingConfig {
    pub fn resolve(&self) -> anyhow::Result<ClaimMapping> {
        match self {
            Self::Preset(name) => ClaimMapping::preset(name)
                .ok_or_else(|| anyhow!("unknown claim mapping preset '{name}'")),
            Self::Custom(mapping) => Ok(mapping.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub identity_provider: IdentityProviderConfig,
    #[serde(default)]
    pub claim_mapping: MappingConfig,
    /// `None` selects the standard policy table.
    #[serde(default)]
    pub policies: Option<Vec<AuthenticationPolicy>>,
}

impl AppConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid configuration document")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Load from `path` if given, else defaults; then apply env overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_IDP_URL) {
            self.identity_provider.base_url = Some(url);
        }
        if let Some(realm) = lookup(ENV_REALM) {
            self.identity_provider.realm = Some(realm);
        }
    }

    pub fn policy_registry(&self) -> anyhow::Result<PolicyRegistry> {
        match &self.policies {
            Some(policies) => {
                PolicyRegistry::new(policies.iter().cloned()).context("invalid policy table")
            }
            None => Ok(PolicyRegistry::standard()),
        }
    }

    /// Replace the configured claim mapping with a named preset.
    pub fn override_mapping(&mut self, preset: Option<String>) {
        if let Some(preset) = preset {
            self.claim_mapping = MappingConfig::Preset(preset);
        }
    }

    pub fn evaluator(&self) -> anyhow::Result<AuthorizationEvaluator> {
        let extractor = StandardClaimsExtractor::new(self.claim_mapping.resolve()?);
        let registry = self.policy_registry()?;
        tracing::info!(
            idp = self.identity_provider.base_url.as_deref().unwrap_or("<unset>"),
            realm = self.identity_provider.realm.as_deref().unwrap_or("<unset>"),
            subject_claim = %extractor.mapping().subject,
            policies = registry.len(),
            "authorization configured"
        );
        Ok(AuthorizationEvaluator::new(Arc::new(extractor), Arc::new(registry)))
    }
}
