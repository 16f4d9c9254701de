//! Material request workflow tests
//!
//! Tests for allocation planning including:
//! - Quantity conservation: allocated + to_order == requested
//! - Partial allocation when stock cannot cover a line
//! - Input validation before any persistence
//! - Idempotent re-approval reporting

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{reserve_plan, AllocationResult, LineStatus, MaterialRequestStatus};
use shared::validation;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A fully stocked line allocates in full with nothing to order
    #[test]
    fn test_full_allocation() {
        let split = reserve_plan(dec("20"), dec("8"));
        assert_eq!(split.allocated, dec("8"));
        assert_eq!(split.to_order, Decimal::ZERO);
    }

    /// Stock of 5 against a request of 7 splits 5 allocated / 2 to order
    #[test]
    fn test_partial_allocation_split() {
        let split = reserve_plan(dec("5"), dec("7"));
        assert_eq!(split.allocated, dec("5"));
        assert_eq!(split.to_order, dec("2"));
    }

    /// An unknown or empty item allocates nothing
    #[test]
    fn test_zero_stock_goes_fully_to_order() {
        let split = reserve_plan(Decimal::ZERO, dec("4"));
        assert_eq!(split.allocated, Decimal::ZERO);
        assert_eq!(split.to_order, dec("4"));
    }

    /// Fractional quantities split exactly
    #[test]
    fn test_fractional_split() {
        let split = reserve_plan(dec("2.5"), dec("6.75"));
        assert_eq!(split.allocated, dec("2.5"));
        assert_eq!(split.to_order, dec("4.25"));
    }

    /// Zero and negative quantities are rejected before planning
    #[test]
    fn test_invalid_quantities_rejected() {
        assert!(validation::validate_positive_quantity(Decimal::ZERO).is_err());
        assert!(validation::validate_positive_quantity(dec("-3")).is_err());
        assert!(validation::validate_positive_quantity(dec("0.001")).is_ok());
    }

    /// A request with only in-stock lines reports no shortfall
    #[test]
    fn test_no_shortfall_when_fully_stocked() {
        let mut result = AllocationResult::default();
        for (on_hand, requested) in [("10", "3"), ("8", "8")] {
            let split = reserve_plan(dec(on_hand), dec(requested));
            result.push_available(None, "Lubricant", split.allocated);
            result.push_to_order(None, "Lubricant", split.to_order);
        }
        assert!(!result.has_shortfall());
        assert_eq!(result.available.len(), 2);
    }

    /// Mixed lines report both the dispatchable and the on-order side
    #[test]
    fn test_mixed_request_reports_both_sides() {
        let mut result = AllocationResult::default();

        let covered = reserve_plan(dec("10"), dec("4"));
        result.push_available(None, "Fasteners", covered.allocated);
        result.push_to_order(None, "Fasteners", covered.to_order);

        let short = reserve_plan(dec("1"), dec("5"));
        result.push_available(None, "Support bearings", short.allocated);
        result.push_to_order(None, "Support bearings", short.to_order);

        assert!(result.has_shortfall());
        assert_eq!(result.available.len(), 2);
        assert_eq!(result.to_order.len(), 1);
        assert_eq!(result.to_order[0].quantity, dec("4"));
    }

    /// Re-reporting a processed request from its recorded lines yields
    /// the same breakdown as the original approval
    #[test]
    fn test_idempotent_reporting_from_recorded_lines() {
        // (allocated, to_order) as stored after approval
        let lines = [("5", "2"), ("3", "0"), ("0", "7")];

        let build = |lines: &[(&str, &str)]| {
            let mut result = AllocationResult::default();
            for (allocated, to_order) in lines {
                result.push_available(None, "Lubricant", dec(allocated));
                result.push_to_order(None, "Lubricant", dec(to_order));
            }
            result
        };

        assert_eq!(build(&lines), build(&lines));
        assert!(build(&lines).has_shortfall());
    }

    /// Request statuses round-trip through their storage form
    #[test]
    fn test_status_storage_round_trip() {
        for status in [
            MaterialRequestStatus::Pending,
            MaterialRequestStatus::InventoryApproved,
            MaterialRequestStatus::Fulfilled,
        ] {
            let parsed: MaterialRequestStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("approved".parse::<MaterialRequestStatus>().is_err());
    }

    /// Line statuses cover the three recorded outcomes
    #[test]
    fn test_line_status_values() {
        assert_eq!(LineStatus::Pending.as_str(), "pending");
        assert_eq!(LineStatus::Allocated.as_str(), "allocated");
        assert_eq!(LineStatus::ToOrder.as_str(), "to_order");
    }

    /// Department is required on every request
    #[test]
    fn test_department_required() {
        assert!(validation::validate_department("").is_err());
        assert!(validation::validate_department("   ").is_err());
        assert!(validation::validate_department("maintenance").is_ok());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating on-hand stock (zero allowed)
    fn stock_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating requested quantities (positive)
    fn requested_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Allocated plus to-order always equals the requested quantity
        #[test]
        fn prop_allocation_conserves_quantity(
            on_hand in stock_strategy(),
            requested in requested_strategy(),
        ) {
            let split = reserve_plan(on_hand, requested);
            prop_assert_eq!(split.allocated + split.to_order, requested);
        }

        /// Allocation never exceeds on-hand stock
        #[test]
        fn prop_allocation_bounded_by_stock(
            on_hand in stock_strategy(),
            requested in requested_strategy(),
        ) {
            let split = reserve_plan(on_hand, requested);
            prop_assert!(split.allocated <= on_hand);
            prop_assert!(split.allocated >= Decimal::ZERO);
        }

        /// The to-order side is never negative
        #[test]
        fn prop_to_order_non_negative(
            on_hand in stock_strategy(),
            requested in requested_strategy(),
        ) {
            let split = reserve_plan(on_hand, requested);
            prop_assert!(split.to_order >= Decimal::ZERO);
        }

        /// A shortfall exists exactly when the request exceeds stock
        #[test]
        fn prop_shortfall_iff_request_exceeds_stock(
            on_hand in stock_strategy(),
            requested in requested_strategy(),
        ) {
            let split = reserve_plan(on_hand, requested);
            prop_assert_eq!(split.to_order > Decimal::ZERO, requested > on_hand);
        }

        /// Zero-quantity sides never appear in the reported breakdown
        #[test]
        fn prop_breakdown_skips_zero_sides(
            on_hand in stock_strategy(),
            requested in requested_strategy(),
        ) {
            let split = reserve_plan(on_hand, requested);
            let mut result = AllocationResult::default();
            result.push_available(None, "Lubricant", split.allocated);
            result.push_to_order(None, "Lubricant", split.to_order);

            for line in result.available.iter().chain(result.to_order.iter()) {
                prop_assert!(line.quantity > Decimal::ZERO);
            }
        }
    }
}
