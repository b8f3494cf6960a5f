//! `claimguard-auth` — provider-agnostic identity extraction and role-based
//! authorization.
//!
//! This crate is intentionally decoupled from HTTP, token verification and
//! storage: it consumes an already-verified [`ClaimsPrincipal`] and answers
//! allow/deny questions about it.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod user;

pub use authorize::AuthorizationEvaluator;
pub use claims::ClaimMapping;
pub use error::{AuthError, AuthResult, MalformedClaimData};
pub use extractor::{ClaimsExtractor, StandardClaimsExtractor, parse_nested_roles};
pub use policy::{AuthenticationPolicy, PolicyRegistry};
pub use principal::{Claim, ClaimsPrincipal};
pub use roles::{Role, RoleSet};
pub use user::AuthenticatedUser;
