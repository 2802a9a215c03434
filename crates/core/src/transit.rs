//! Shipment transit quality counters and release quantity rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from transit counter or release quantity validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitError {
    /// A counter was negative.
    #[error("counter '{0}' must not be negative")]
    NegativeCounter(&'static str),

    /// A release quantity was zero or negative.
    #[error("release quantity must be positive")]
    NonPositiveQuantity,
}

impl From<TransitError> for flutr_shared::AppError {
    fn from(err: TransitError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Transit quality counters for one shipment line item.
///
/// All counters default to zero; values are per-shipment-item and never
/// aggregated here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitCounts {
    /// Butterflies that emerged during transit.
    #[serde(default)]
    pub emerged_in_transit: i32,
    /// Pupae damaged during transit.
    #[serde(default)]
    pub damaged_in_transit: i32,
    /// Pupae found diseased on arrival.
    #[serde(default)]
    pub diseased_in_transit: i32,
    /// Pupae lost to parasites.
    #[serde(default)]
    pub parasite: i32,
    /// Pupae that never emerged.
    #[serde(default)]
    pub non_emergence: i32,
    /// Butterflies that emerged malformed.
    #[serde(default)]
    pub poor_emergence: i32,
}

impl TransitCounts {
    /// Validates that every counter is non-negative.
    ///
    /// # Errors
    ///
    /// Returns `TransitError::NegativeCounter` naming the first offending
    /// counter.
    pub const fn validate(&self) -> Result<(), TransitError> {
        if self.emerged_in_transit < 0 {
            return Err(TransitError::NegativeCounter("emerged_in_transit"));
        }
        if self.damaged_in_transit < 0 {
            return Err(TransitError::NegativeCounter("damaged_in_transit"));
        }
        if self.diseased_in_transit < 0 {
            return Err(TransitError::NegativeCounter("diseased_in_transit"));
        }
        if self.parasite < 0 {
            return Err(TransitError::NegativeCounter("parasite"));
        }
        if self.non_emergence < 0 {
            return Err(TransitError::NegativeCounter("non_emergence"));
        }
        if self.poor_emergence < 0 {
            return Err(TransitError::NegativeCounter("poor_emergence"));
        }
        Ok(())
    }
}

/// Validates the number received on a shipment line item.
///
/// # Errors
///
/// Returns `TransitError::NegativeCounter` when negative.
pub const fn validate_number_received(number_received: i32) -> Result<(), TransitError> {
    if number_received < 0 {
        return Err(TransitError::NegativeCounter("number_received"));
    }
    Ok(())
}

/// Validates a release item quantity.
///
/// # Errors
///
/// Returns `TransitError::NonPositiveQuantity` when zero or negative.
pub const fn validate_release_quantity(quantity: i32) -> Result<(), TransitError> {
    if quantity <= 0 {
        return Err(TransitError::NonPositiveQuantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts_are_valid() {
        assert!(TransitCounts::default().validate().is_ok());
    }

    #[test]
    fn test_negative_counter_named() {
        let counts = TransitCounts {
            diseased_in_transit: -1,
            ..TransitCounts::default()
        };
        assert_eq!(
            counts.validate().unwrap_err(),
            TransitError::NegativeCounter("diseased_in_transit")
        );
    }

    #[test]
    fn test_number_received_bounds() {
        assert!(validate_number_received(0).is_ok());
        assert!(validate_number_received(250).is_ok());
        assert!(validate_number_received(-1).is_err());
    }

    #[test]
    fn test_release_quantity_must_be_positive() {
        assert!(validate_release_quantity(1).is_ok());
        assert_eq!(
            validate_release_quantity(0).unwrap_err(),
            TransitError::NonPositiveQuantity
        );
        assert_eq!(
            validate_release_quantity(-4).unwrap_err(),
            TransitError::NonPositiveQuantity
        );
    }
}
