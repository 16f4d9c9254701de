//! Inventory ledger tests
//!
//! Tests for stock arithmetic including:
//! - Non-negative balance invariant
//! - Capped deduction at approval time
//! - Credit on purchase order receipt
//! - Item validation rules

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::reserve_plan;
use shared::validation;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Capped deduction as applied at approval time: take what is on hand,
/// never more, never below zero
fn deduct_up_to(on_hand: Decimal, requested: Decimal) -> (Decimal, Decimal) {
    let take = on_hand.min(requested).max(Decimal::ZERO);
    (take, on_hand - take)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A covered deduction takes the full amount
    #[test]
    fn test_deduct_within_stock() {
        let (taken, remaining) = deduct_up_to(dec("10"), dec("4"));
        assert_eq!(taken, dec("4"));
        assert_eq!(remaining, dec("6"));
    }

    /// Deducting more than on hand takes only what exists
    #[test]
    fn test_deduct_capped_at_stock() {
        let (taken, remaining) = deduct_up_to(dec("3"), dec("8"));
        assert_eq!(taken, dec("3"));
        assert_eq!(remaining, Decimal::ZERO);
    }

    /// An empty item yields nothing
    #[test]
    fn test_deduct_from_empty_item() {
        let (taken, remaining) = deduct_up_to(Decimal::ZERO, dec("5"));
        assert_eq!(taken, Decimal::ZERO);
        assert_eq!(remaining, Decimal::ZERO);
    }

    /// Stock that moved between planning and approval caps the take
    /// at what is left, not at the planned allocation
    #[test]
    fn test_stale_plan_capped_at_approval() {
        // Planned against 7 on hand
        let plan = reserve_plan(dec("7"), dec("7"));
        assert_eq!(plan.allocated, dec("7"));

        // A concurrent approval drained 5 before this one ran
        let (taken, remaining) = deduct_up_to(dec("2"), plan.allocated);
        assert_eq!(taken, dec("2"));
        assert_eq!(remaining, Decimal::ZERO);
    }

    /// Receiving credits stock; a deduct-then-credit cycle restores
    /// the original balance
    #[test]
    fn test_credit_restores_balance() {
        let start = dec("10");
        let (taken, after_deduct) = deduct_up_to(start, dec("6"));
        let after_credit = after_deduct + taken;
        assert_eq!(after_credit, start);
    }

    /// Deducting exactly the on-hand amount is the boundary the strict
    /// conditional update still accepts: the item empties, nothing is
    /// left to refuse
    #[test]
    fn test_deduct_exact_stock_boundary() {
        let (taken, remaining) = deduct_up_to(dec("5"), dec("5"));
        assert_eq!(taken, dec("5"));
        assert_eq!(remaining, Decimal::ZERO);

        // One step past the boundary caps instead of going negative
        let (taken, remaining) = deduct_up_to(dec("5"), dec("5.001"));
        assert_eq!(taken, dec("5"));
        assert_eq!(remaining, Decimal::ZERO);
    }

    /// Item names must be present and within bounds
    #[test]
    fn test_item_name_validation() {
        assert!(validation::validate_item_name("Lubricant").is_ok());
        assert!(validation::validate_item_name("").is_err());
        assert!(validation::validate_item_name("   ").is_err());
    }

    /// Item codes are short uppercase identifiers
    #[test]
    fn test_item_code_validation() {
        assert!(validation::validate_item_code("LUB").is_ok());
        assert!(validation::validate_item_code("AUTO-SUPPORTB-1A2B3C4D").is_ok());
        assert!(validation::validate_item_code("x").is_err());
        assert!(validation::validate_item_code("lowercase").is_err());
    }

    /// Stored quantities are never negative
    #[test]
    fn test_non_negative_quantity_validation() {
        assert!(validation::validate_non_negative_quantity(Decimal::ZERO).is_ok());
        assert!(validation::validate_non_negative_quantity(dec("12.5")).is_ok());
        assert!(validation::validate_non_negative_quantity(dec("-0.1")).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating stock levels (zero allowed)
    fn stock_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating deduction requests (positive)
    fn request_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The remaining balance is never negative
        #[test]
        fn prop_balance_never_negative(
            on_hand in stock_strategy(),
            requested in request_strategy(),
        ) {
            let (_, remaining) = deduct_up_to(on_hand, requested);
            prop_assert!(remaining >= Decimal::ZERO);
        }

        /// The amount taken never exceeds the request or the stock
        #[test]
        fn prop_take_bounded(
            on_hand in stock_strategy(),
            requested in request_strategy(),
        ) {
            let (taken, _) = deduct_up_to(on_hand, requested);
            prop_assert!(taken <= requested);
            prop_assert!(taken <= on_hand);
        }

        /// Taken plus remaining equals the starting stock
        #[test]
        fn prop_deduction_conserves_stock(
            on_hand in stock_strategy(),
            requested in request_strategy(),
        ) {
            let (taken, remaining) = deduct_up_to(on_hand, requested);
            prop_assert_eq!(taken + remaining, on_hand);
        }

        /// A deduct followed by an equal credit restores the balance
        #[test]
        fn prop_deduct_credit_round_trip(
            on_hand in stock_strategy(),
            requested in request_strategy(),
        ) {
            let (taken, remaining) = deduct_up_to(on_hand, requested);
            prop_assert_eq!(remaining + taken, on_hand);
        }
    }
}
