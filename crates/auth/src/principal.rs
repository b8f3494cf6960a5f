use serde::{Deserialize, Serialize};

/// A single (claim type, claim value) pair asserted about a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// The claims principal handed over by upstream authentication middleware.
///
/// Token/assertion verification has already happened by the time one of these
/// exists; this type only carries what the middleware produced: an ordered
/// claim list and whether the identity counts as authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsPrincipal {
    #[serde(default)]
    authenticated: bool,
    #[serde(default)]
    claims: Vec<Claim>,
}

impl ClaimsPrincipal {
    pub fn new(authenticated: bool, claims: Vec<Claim>) -> Self {
        Self {
            authenticated,
            claims,
        }
    }

    /// An authenticated principal carrying `claims`.
    pub fn authenticated<I, T, V>(claims: I) -> Self
    where
        I: IntoIterator<Item = (T, V)>,
        T: Into<String>,
        V: Into<String>,
    {
        Self::new(
            true,
            claims.into_iter().map(|(t, v)| Claim::new(t, v)).collect(),
        )
    }

    /// A principal with no authenticated identity (e.g. anonymous request).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Value of the first claim of `claim_type`, if any.
    pub fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// Values of every claim of `claim_type`, in order.
    pub fn find_all<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .iter()
            .filter(move |c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    pub fn has_claim(&self, claim_type: &str) -> bool {
        self.claims.iter().any(|c| c.claim_type == claim_type)
    }
}
