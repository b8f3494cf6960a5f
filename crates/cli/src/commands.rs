//! Command implementations, kept free of process concerns so they can be
//! tested directly.

use std::path::Path;

use anyhow::{Context, bail};
use serde::Serialize;

use claimguard_auth::{AuthorizationEvaluator, ClaimsPrincipal};

/// Exit status for an allowed check or a successful command.
pub const EXIT_ALLOW: u8 = 0;
/// Exit status for a denied check or an unauthenticated principal.
pub const EXIT_DENY: u8 = 1;
/// Exit status for configuration, input or usage errors.
pub const EXIT_ERROR: u8 = 2;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }

    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Allow => EXIT_ALLOW,
            Self::Deny => EXIT_DENY,
        }
    }
}

impl core::fmt::Display for Decision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to check a principal against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Policy(String),
    Roles(Vec<String>),
}

impl Requirement {
    /// Select the requirement from `--policy` / `--role` arguments.
    pub fn from_args(policy: Option<String>, roles: Vec<String>) -> anyhow::Result<Self> {
        match policy {
            Some(name) => Ok(Self::Policy(name)),
            None if !roles.is_empty() => Ok(Self::Roles(roles)),
            None => bail!("either --policy or at least one --role is required"),
        }
    }
}

/// What a command prints to stdout and the status the process exits with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub status: u8,
}

impl Outcome {
    fn new(output: impl Into<String>, status: u8) -> Self {
        Self {
            output: output.into(),
            status,
        }
    }
}

pub fn read_principal(path: &Path) -> anyhow::Result<ClaimsPrincipal> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read principal file {}", path.display()))?;
    parse_principal(&raw).with_context(|| format!("in {}", path.display()))
}

pub fn parse_principal(json: &str) -> anyhow::Result<ClaimsPrincipal> {
    serde_json::from_str(json).context("invalid principal document")
}

/// Extracted user as pretty JSON, or `None` for an unauthenticated principal.
pub fn inspect(
    evaluator: &AuthorizationEvaluator,
    principal: &ClaimsPrincipal,
) -> anyhow::Result<Option<String>> {
    match evaluator.get_authenticated_user(principal) {
        Some(user) => Ok(Some(serde_json::to_string_pretty(&user)?)),
        None => Ok(None),
    }
}

pub fn inspect_outcome(
    evaluator: &AuthorizationEvaluator,
    principal: &ClaimsPrincipal,
) -> anyhow::Result<Outcome> {
    Ok(match inspect(evaluator, principal)? {
        Some(json) => Outcome::new(json, EXIT_ALLOW),
        None => Outcome::new("not authenticated", EXIT_DENY),
    })
}

pub fn check(
    evaluator: &AuthorizationEvaluator,
    principal: &ClaimsPrincipal,
    requirement: &Requirement,
) -> anyhow::Result<Decision> {
    let allowed = match requirement {
        Requirement::Policy(name) => evaluator.authorize_named(principal, name)?,
        Requirement::Roles(roles) => {
            evaluator.authorize_principal_by_roles(principal, Some(roles.as_slice()))?
        }
    };
    Ok(Decision::from_allowed(allowed))
}

pub fn check_outcome(
    evaluator: &AuthorizationEvaluator,
    principal: &ClaimsPrincipal,
    requirement: &Requirement,
) -> anyhow::Result<Outcome> {
    let decision = check(evaluator, principal, requirement)?;
    Ok(Outcome::new(decision.as_str(), decision.exit_status()))
}

#[derive(Debug, Serialize)]
struct PolicyRow<'a> {
    name: &'a str,
    description: Option<&'a str>,
    required_roles: Vec<&'a str>,
}

/// The configured policy table as pretty JSON.
pub fn list_policies(evaluator: &AuthorizationEvaluator) -> anyhow::Result<String> {
    let rows: Vec<PolicyRow<'_>> = evaluator
        .policies()
        .iter()
        .map(|p| PolicyRow {
            name: p.name(),
            description: p.description(),
            required_roles: p.required_roles().iter().map(|r| r.as_str()).collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

pub fn policies_outcome(evaluator: &AuthorizationEvaluator) -> anyhow::Result<Outcome> {
    Ok(Outcome::new(list_policies(evaluator)?, EXIT_ALLOW))
}
