//! Property-based integration tests for the rebalancing engine.
//!
//! These tests verify that the allocation arithmetic holds across randomly
//! generated portfolios, using the `proptest` crate for case generation.

use familyfolio_core::portfolios::{FundHolding, Portfolio};
use familyfolio_core::rebalancing::{
    build_recommendations, compute_snapshot, distribute_lumpsum, distribute_sip, fund_gap,
    plan_buy_sell, plan_sip, AllocationStatus, SipMode,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Division at 28 significant digits leaves tiny remainders.
const TOLERANCE: Decimal = dec!(0.000000001);

fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= TOLERANCE
}

// =============================================================================
// Generators
// =============================================================================

/// Generates a monetary value with two decimal places, up to 10 million.
fn arb_value() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generates a strictly positive monetary value.
fn arb_positive_value() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generates whole-number target percentages that sum to exactly 100.
fn arb_targets(max_funds: usize) -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(1u32..100, 1..=max_funds).prop_map(|weights| {
        let sum: u32 = weights.iter().sum();
        let mut targets: Vec<u32> = weights.iter().map(|w| w * 100 / sum).collect();
        let assigned: u32 = targets.iter().sum();
        if let Some(last) = targets.last_mut() {
            *last += 100 - assigned;
        }
        targets.into_iter().map(Decimal::from).collect()
    })
}

/// Generates holdings whose targets sum to 100 and whose total is positive.
fn arb_holdings(max_funds: usize) -> impl Strategy<Value = Vec<FundHolding>> {
    arb_targets(max_funds)
        .prop_flat_map(|targets| {
            let len = targets.len();
            (
                Just(targets),
                proptest::collection::vec(arb_value(), len),
                arb_positive_value(),
            )
        })
        .prop_map(|(targets, mut values, extra)| {
            // Guarantee a non-empty portfolio
            values[0] += extra;
            targets
                .into_iter()
                .zip(values)
                .enumerate()
                .map(|(i, (target, value))| {
                    FundHolding::new(format!("FUND{}", i), value, Some(target))
                })
                .collect()
        })
}

/// Generates a threshold between 0 and 20 percentage points.
fn arb_threshold() -> impl Strategy<Value = Decimal> {
    (0i64..2000).prop_map(|bp| Decimal::new(bp, 2))
}

fn portfolio(threshold: Decimal, sip: Decimal, lumpsum: Decimal) -> Portfolio {
    Portfolio {
        id: "prop".to_string(),
        name: "Property portfolio".to_string(),
        owner: None,
        rebalance_threshold: threshold,
        sip_amount: Some(sip),
        lumpsum_amount: Some(lumpsum),
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Feature: rebalancing, Property 1: Current percentages sum to 100**
    ///
    /// For any portfolio with a positive total, the current percentages of
    /// all funds add up to 100.
    #[test]
    fn prop_current_percentages_sum_to_hundred(holdings in arb_holdings(8)) {
        let snapshot = compute_snapshot(&holdings).unwrap();
        let sum: Decimal = snapshot.allocations.iter().map(|a| a.current_percent).sum();
        prop_assert!(close(sum, dec!(100)), "percentages summed to {}", sum);
    }

    /// **Feature: rebalancing, Property 2: Buy/sell amounts net to zero**
    ///
    /// With a zero threshold every off-target fund is actionable, so when
    /// targets sum to 100 the buys exactly fund the sells.
    #[test]
    fn prop_buy_sell_nets_to_zero_at_zero_threshold(holdings in arb_holdings(8)) {
        let plan = plan_buy_sell(&holdings, Decimal::ZERO).unwrap();
        let net: Decimal = plan.values().copied().sum();
        prop_assert!(close(net, Decimal::ZERO), "buy/sell netted to {}", net);
    }

    /// **Feature: rebalancing, Property 3: Balanced funds never trade**
    ///
    /// A fund classified as balanced always gets a zero buy/sell amount, and
    /// a non-zero amount always points towards the target.
    #[test]
    fn prop_buy_sell_follows_status(
        holdings in arb_holdings(8),
        threshold in arb_threshold(),
    ) {
        let report = build_recommendations(
            &portfolio(threshold, Decimal::ZERO, Decimal::ZERO),
            &holdings,
        )
        .unwrap();

        for fund in &report.funds {
            match fund.status {
                AllocationStatus::Balanced => {
                    prop_assert_eq!(fund.buy_sell_amount, Decimal::ZERO);
                    prop_assert!(fund.deviation.abs() <= threshold);
                }
                AllocationStatus::Overweight => prop_assert!(fund.buy_sell_amount <= Decimal::ZERO),
                AllocationStatus::Underweight => prop_assert!(fund.buy_sell_amount >= Decimal::ZERO),
            }
        }
    }

    /// **Feature: rebalancing, Property 4: SIP distributes all the cash**
    ///
    /// Whichever branch applies, the SIP amounts add up to the SIP cash
    /// because targets sum to 100.
    #[test]
    fn prop_sip_conserves_cash(
        holdings in arb_holdings(8),
        cash in arb_value(),
    ) {
        let plan = plan_sip(&holdings, Decimal::ZERO, cash).unwrap();
        let distributed: Decimal = plan.values().copied().sum();
        prop_assert!(close(distributed, cash), "distributed {} of {}", distributed, cash);
        prop_assert!(plan.values().all(|amount| *amount >= Decimal::ZERO));
    }

    /// **Feature: rebalancing, Property 5: SIP falls back to targets on a balanced portfolio**
    ///
    /// Holdings sitting exactly at target have no gap, so the SIP is split by
    /// target percentage and still adds up to the cash.
    #[test]
    fn prop_sip_target_branch_conserves_cash(
        targets in arb_targets(8),
        scale in 1i64..100_000,
        cash in arb_positive_value(),
    ) {
        let holdings: Vec<FundHolding> = targets
            .iter()
            .enumerate()
            .map(|(i, t)| FundHolding::new(format!("FUND{}", i), *t * Decimal::from(scale), Some(*t)))
            .collect();

        let snapshot = compute_snapshot(&holdings).unwrap();
        let distribution = distribute_sip(&snapshot, cash).unwrap();
        prop_assert_eq!(distribution.mode, SipMode::TargetProportional);

        let distributed: Decimal = distribution.amounts.iter().copied().sum();
        prop_assert!(close(distributed, cash));
    }

    /// **Feature: rebalancing, Property 6: Only underweight value has a gap**
    ///
    /// A fund has a positive gap exactly when it holds less than its target
    /// value, and SIP cash only goes to funds with a gap while any gap exists.
    #[test]
    fn prop_gap_is_exclusive_to_shortfall(
        holdings in arb_holdings(8),
        cash in arb_positive_value(),
    ) {
        let snapshot = compute_snapshot(&holdings).unwrap();
        let distribution = distribute_sip(&snapshot, cash).unwrap();

        for (allocation, amount) in snapshot.allocations.iter().zip(&distribution.amounts) {
            let gap = fund_gap(allocation);
            prop_assert!(gap >= Decimal::ZERO);
            prop_assert_eq!(gap > Decimal::ZERO, allocation.current_value < allocation.target_value);
            if distribution.mode == SipMode::GapProportional && gap.is_zero() {
                prop_assert_eq!(*amount, Decimal::ZERO);
            }
        }
    }

    /// **Feature: rebalancing, Property 7: Lumpsum amounts and residual reconcile**
    ///
    /// Lumpsum amounts are never negative, and amounts plus the reported
    /// residual always add back to the injected cash.
    #[test]
    fn prop_lumpsum_residual_reconciles(
        holdings in arb_holdings(8),
        threshold in arb_threshold(),
        cash in arb_value(),
    ) {
        let snapshot = compute_snapshot(&holdings).unwrap();
        let distribution = distribute_lumpsum(&snapshot, threshold, cash).unwrap();

        let distributed: Decimal = distribution.amounts.iter().map(|(amount, _)| *amount).sum();
        prop_assert!(distribution.amounts.iter().all(|(amount, _)| *amount >= Decimal::ZERO));
        prop_assert!(close(distributed + distribution.residual, cash));
    }

    /// **Feature: rebalancing, Property 8: Recommendations are deterministic**
    ///
    /// Running the engine twice on the same input yields the same snapshot
    /// and the same report.
    #[test]
    fn prop_recommendations_are_idempotent(
        holdings in arb_holdings(8),
        threshold in arb_threshold(),
        sip in arb_value(),
        lumpsum in arb_value(),
    ) {
        prop_assert_eq!(
            compute_snapshot(&holdings).unwrap(),
            compute_snapshot(&holdings).unwrap()
        );

        let portfolio = portfolio(threshold, sip, lumpsum);
        let first = build_recommendations(&portfolio, &holdings).unwrap();
        let second = build_recommendations(&portfolio, &holdings).unwrap();
        prop_assert_eq!(first, second);
    }
}
