//! Property tests over arbitrary claim data.

use std::collections::HashSet;

use proptest::prelude::*;

use claimguard_auth::{
    AuthenticationPolicy, AuthorizationEvaluator, Claim, ClaimMapping, ClaimsExtractor,
    ClaimsPrincipal, StandardClaimsExtractor, claims::REGISTERED_CLAIMS,
};

fn claim_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("sub".to_string()),
        Just("email".to_string()),
        Just("name".to_string()),
        Just("preferred_username".to_string()),
        Just("role".to_string()),
        Just("realm_access".to_string()),
        Just("iss".to_string()),
        Just("scope".to_string()),
        "[a-z_]{1,8}",
    ]
}

fn claim_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,16}",
        proptest::collection::vec("[A-Za-z]{1,6}", 0..4)
            .prop_map(|roles| serde_json::json!({ "roles": roles }).to_string()),
    ]
}

fn principal() -> impl Strategy<Value = ClaimsPrincipal> {
    (
        any::<bool>(),
        proptest::collection::vec((claim_type(), claim_value()), 0..12),
    )
        .prop_map(|(authenticated, claims)| {
            ClaimsPrincipal::new(
                authenticated,
                claims.into_iter().map(|(t, v)| Claim::new(t, v)).collect(),
            )
        })
}

fn valid_principal() -> impl Strategy<Value = ClaimsPrincipal> {
    (
        "[a-z0-9]{1,8}",
        "[a-z]{1,6}@[a-z]{1,6}\\.com",
        proptest::collection::vec("[A-Za-z]{1,6}", 0..5),
        proptest::collection::vec("[A-Za-z]{1,6}", 0..5),
    )
        .prop_map(|(sub, email, flat, nested)| {
            let mut p = ClaimsPrincipal::authenticated([("sub", sub), ("email", email)]);
            for role in flat {
                p = p.with_claim("role", role);
            }
            let container = serde_json::json!({ "roles": nested });
            p.with_claim("realm_access", container.to_string())
        })
}

proptest! {
    #[test]
    fn extraction_never_panics_and_is_idempotent(p in principal()) {
        let extractor = StandardClaimsExtractor::keycloak();
        let first = extractor.extract_from_principal(&p);
        let second = extractor.extract_from_principal(&p);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_some(), extractor.is_valid_principal(&p));
    }

    #[test]
    fn unauthenticated_is_always_rejected(p in principal()) {
        let p = ClaimsPrincipal::new(false, p.claims().to_vec());
        let extractor = StandardClaimsExtractor::keycloak();
        prop_assert!(!extractor.is_valid_principal(&p));
        prop_assert!(extractor.extract_from_principal(&p).is_none());
    }

    #[test]
    fn roles_are_case_insensitive_union(p in valid_principal()) {
        let user = StandardClaimsExtractor::keycloak().extract_from_principal(&p).unwrap();

        let mut expected: HashSet<String> =
            p.find_all("role").map(str::to_lowercase).collect();
        if let Some(raw) = p.find_first("realm_access") {
            expected.extend(
                claimguard_auth::parse_nested_roles(raw)
                    .unwrap()
                    .into_iter()
                    .map(|r| r.to_lowercase()),
            );
        }

        let actual: HashSet<String> =
            user.roles().iter().map(|r| r.as_str().to_lowercase()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(user.roles().len(), user.roles().iter().count());
    }

    #[test]
    fn custom_claims_exclude_standard_types_and_keep_first(p in principal()) {
        let Some(user) = StandardClaimsExtractor::keycloak().extract_from_principal(&p) else {
            return Ok(());
        };
        let excluded = ClaimMapping::keycloak().excluded_claim_types();
        for registered in REGISTERED_CLAIMS {
            prop_assert!(!user.custom_claims().contains_key(*registered));
        }

        let mut seen = HashSet::new();
        for claim in p.claims() {
            if excluded.contains(&claim.claim_type) {
                prop_assert!(!user.custom_claims().contains_key(&claim.claim_type));
            } else if seen.insert(claim.claim_type.clone()) {
                prop_assert_eq!(
                    user.custom_claim(&claim.claim_type),
                    Some(claim.value.as_str())
                );
            }
        }
        prop_assert_eq!(user.custom_claims().len(), seen.len());
    }

    #[test]
    fn authenticated_only_admits_every_valid_user(p in valid_principal()) {
        let evaluator = AuthorizationEvaluator::keycloak();
        prop_assert!(evaluator.authorize(&p, &AuthenticationPolicy::authenticated_only()));
    }

    #[test]
    fn role_match_ignores_case(role in "[a-z]{1,8}", upper in any::<bool>()) {
        let presented = if upper { role.to_uppercase() } else { role.clone() };
        let p = ClaimsPrincipal::authenticated([("sub", "u1"), ("email", "a@b.com")])
            .with_claim("role", presented);
        let policy = AuthenticationPolicy::new("p", None, [role]).unwrap();
        prop_assert!(AuthorizationEvaluator::keycloak().authorize(&p, &policy));
    }
}
