//! Property-based tests for the tenant-consistency decision rules.

use proptest::prelude::*;

use super::{
    DeleteDecision, DeletePolicy, TenancyError, check_owner, delete_decision,
};

/// Strategy to generate institution ids in a small range so that collisions
/// (same-tenant pairings) actually occur.
fn institution_id() -> impl Strategy<Value = i64> {
    1i64..50
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A resolved reference is accepted exactly when the owning institution
    /// matches the child's institution.
    #[test]
    fn prop_reference_accepted_iff_owner_matches(
        child in institution_id(),
        owner in institution_id(),
    ) {
        let result = check_owner("shipments", 1, child, Some(owner));
        if child == owner {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result.unwrap_err(),
                TenancyError::TenantMismatch { table: "shipments", reference: "1".to_string() }
            );
        }
    }

    /// An unresolved reference is always NotFound, never TenantMismatch,
    /// regardless of the child institution.
    #[test]
    fn prop_missing_reference_is_not_found(child in institution_id()) {
        prop_assert_eq!(
            check_owner("suppliers", "XYZ", child, None).unwrap_err(),
            TenancyError::NotFound { table: "suppliers", reference: "XYZ".to_string() }
        );
    }

    /// Restrict blocks exactly when dependents exist and reports the count.
    #[test]
    fn prop_restrict_blocks_iff_dependents(dependents in 0u64..10_000) {
        match delete_decision(DeletePolicy::Restrict, dependents) {
            DeleteDecision::Proceed => prop_assert_eq!(dependents, 0),
            DeleteDecision::Blocked { dependents: reported } => {
                prop_assert!(dependents > 0);
                prop_assert_eq!(reported, dependents);
            }
        }
    }

    /// Cascade never blocks.
    #[test]
    fn prop_cascade_never_blocks(dependents in 0u64..10_000) {
        prop_assert_eq!(
            delete_decision(DeletePolicy::Cascade, dependents),
            DeleteDecision::Proceed
        );
    }
}
