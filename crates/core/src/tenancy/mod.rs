//! Tenant-consistency and delete-policy decision rules.
//!
//! Every tenant-owned row carries an `institution_id`; a cross-table
//! reference inside tenant-owned data is valid only when the referenced row
//! exists and is owned by the same institution. This module holds the pure
//! decision half of that enforcement: given what a lookup found, decide.
//! The database layer performs the lookups inside the writing transaction
//! and defers to these rules.

use thiserror::Error;

#[cfg(test)]
mod props;

/// Violations of the tenant-consistency invariant family.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TenancyError {
    /// The referenced row does not exist at all.
    #[error("referenced {table} row '{reference}' does not exist")]
    NotFound {
        /// Referenced table name.
        table: &'static str,
        /// Human-readable reference (id or code).
        reference: String,
    },

    /// The referenced row exists but is owned by a different institution.
    #[error("referenced {table} row '{reference}' belongs to a different institution")]
    TenantMismatch {
        /// Referenced table name.
        table: &'static str,
        /// Human-readable reference (id or code).
        reference: String,
    },
}

/// Maps a tenancy violation into the application error taxonomy.
impl From<TenancyError> for flutr_shared::AppError {
    fn from(err: TenancyError) -> Self {
        match &err {
            TenancyError::NotFound { .. } => Self::NotFound(err.to_string()),
            TenancyError::TenantMismatch { .. } => Self::TenantMismatch(err.to_string()),
        }
    }
}

/// Checks a resolved reference against the owning institution.
///
/// `found_owner` is the `institution_id` of the referenced row, or `None`
/// when the lookup matched nothing. A soft-deleted row still has an owner
/// and therefore still validates; only absence or a foreign owner rejects.
///
/// # Errors
///
/// Returns `TenancyError::NotFound` when the reference resolves to nothing,
/// `TenancyError::TenantMismatch` when it resolves to a row owned by
/// another institution.
pub fn check_owner(
    table: &'static str,
    reference: impl ToString,
    child_institution_id: i64,
    found_owner: Option<i64>,
) -> Result<(), TenancyError> {
    match found_owner {
        None => Err(TenancyError::NotFound {
            table,
            reference: reference.to_string(),
        }),
        Some(owner) if owner != child_institution_id => Err(TenancyError::TenantMismatch {
            table,
            reference: reference.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Deletion policy for a parent row with dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Dependents are deleted with the parent, children before parents.
    Cascade,
    /// Deletion is rejected while any dependent exists.
    Restrict,
}

/// Parents whose deletion is governed by an explicit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    /// Tenant root; deleting it removes everything the institution owns.
    Institution,
    /// Shipment header; items and release events hang off it.
    Shipment,
    /// Release event; release items hang off it.
    ReleaseEvent,
    /// Global catalog row shared by all tenants.
    Species,
    /// Tenant supplier, referenced by shipments via code.
    Supplier,
    /// Shipment line item, referenced by release items.
    ShipmentItem,
}

impl ParentKind {
    /// Returns the deletion policy for this parent kind.
    ///
    /// Suppliers are restrict on hard delete; the supported lifecycle for a
    /// referenced supplier is deactivation (soft delete), which keeps the
    /// row and its code resolvable for historical shipments.
    #[must_use]
    pub const fn delete_policy(self) -> DeletePolicy {
        match self {
            Self::Institution | Self::Shipment | Self::ReleaseEvent => DeletePolicy::Cascade,
            Self::Species | Self::Supplier | Self::ShipmentItem => DeletePolicy::Restrict,
        }
    }

    /// Returns the table name of this parent kind.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Institution => "institutions",
            Self::Shipment => "shipments",
            Self::ReleaseEvent => "release_events",
            Self::Species => "butterfly_species",
            Self::Supplier => "suppliers",
            Self::ShipmentItem => "shipment_items",
        }
    }
}

/// Outcome of applying a delete policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDecision {
    /// The delete may proceed (cascading to dependents where applicable).
    Proceed,
    /// The delete is rejected because dependents still exist.
    Blocked {
        /// Number of dependent rows found.
        dependents: u64,
    },
}

/// Decides whether a delete may proceed given the dependent count.
#[must_use]
pub const fn delete_decision(policy: DeletePolicy, dependents: u64) -> DeleteDecision {
    match policy {
        DeletePolicy::Cascade => DeleteDecision::Proceed,
        DeletePolicy::Restrict => {
            if dependents == 0 {
                DeleteDecision::Proceed
            } else {
                DeleteDecision::Blocked { dependents }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_owner_accepts_same_institution() {
        assert!(check_owner("suppliers", "LPS", 1, Some(1)).is_ok());
    }

    #[test]
    fn test_check_owner_rejects_missing_row() {
        let err = check_owner("suppliers", "LPS", 2, None).unwrap_err();
        assert_eq!(
            err,
            TenancyError::NotFound {
                table: "suppliers",
                reference: "LPS".to_string()
            }
        );
    }

    #[test]
    fn test_check_owner_rejects_foreign_owner() {
        let err = check_owner("shipment_items", 10, 1, Some(2)).unwrap_err();
        assert_eq!(
            err,
            TenancyError::TenantMismatch {
                table: "shipment_items",
                reference: "10".to_string()
            }
        );
    }

    #[test]
    fn test_delete_policies() {
        assert_eq!(
            ParentKind::Institution.delete_policy(),
            DeletePolicy::Cascade
        );
        assert_eq!(ParentKind::Shipment.delete_policy(), DeletePolicy::Cascade);
        assert_eq!(
            ParentKind::ReleaseEvent.delete_policy(),
            DeletePolicy::Cascade
        );
        assert_eq!(ParentKind::Species.delete_policy(), DeletePolicy::Restrict);
        assert_eq!(ParentKind::Supplier.delete_policy(), DeletePolicy::Restrict);
        assert_eq!(
            ParentKind::ShipmentItem.delete_policy(),
            DeletePolicy::Restrict
        );
    }

    #[test]
    fn test_restrict_blocks_with_dependents() {
        assert_eq!(
            delete_decision(DeletePolicy::Restrict, 3),
            DeleteDecision::Blocked { dependents: 3 }
        );
        assert_eq!(
            delete_decision(DeletePolicy::Restrict, 0),
            DeleteDecision::Proceed
        );
    }

    #[test]
    fn test_cascade_always_proceeds() {
        assert_eq!(
            delete_decision(DeletePolicy::Cascade, 1_000),
            DeleteDecision::Proceed
        );
    }
}
