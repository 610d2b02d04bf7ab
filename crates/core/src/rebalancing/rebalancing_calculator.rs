//! Allocation and rebalancing calculations.
//!
//! All functions here are pure: they validate their input, compute from it,
//! and keep no state between calls. Division by a zero portfolio total or a
//! zero total gap is handled by explicit branches, never by erroring.

use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::{MAX_PORTFOLIO_VALUE, PERCENT_SCALE, TARGET_SUM_TOLERANCE};
use crate::errors::{Result, ValidationError};
use crate::portfolios::{validate_cash_amount, validate_threshold, FundHolding, Portfolio};

use super::rebalancing_model::{
    AllocationStatus, FundAllocation, FundRecommendation, LumpsumDistribution, LumpsumMode,
    PortfolioRecommendations, PortfolioSnapshot, SipDistribution, SipMode,
};

/// Validates every holding, rejects duplicate fund ids and bounds the portfolio total.
pub fn validate_holdings(holdings: &[FundHolding]) -> Result<()> {
    let mut seen = HashSet::with_capacity(holdings.len());
    let mut total = Decimal::ZERO;
    for holding in holdings {
        holding.validate()?;
        if !seen.insert(holding.fund_id.as_str()) {
            return Err(ValidationError::DuplicateFund(holding.fund_id.clone()).into());
        }
        total = total
            .checked_add(holding.current_value)
            .ok_or_else(|| ValidationError::Overflow("portfolio total".to_string()))?;
    }
    if total > MAX_PORTFOLIO_VALUE {
        return Err(ValidationError::AmountTooLarge {
            name: "Portfolio total".to_string(),
            value: total,
            max: MAX_PORTFOLIO_VALUE,
        }
        .into());
    }
    Ok(())
}

/// `value * factor / divisor`, failing instead of panicking on overflow.
fn scaled(value: Decimal, factor: Decimal, divisor: Decimal, what: &str) -> Result<Decimal> {
    value
        .checked_mul(factor)
        .and_then(|product| product.checked_div(divisor))
        .ok_or_else(|| ValidationError::Overflow(what.to_string()).into())
}

/// `value` as a percentage of `total`, or zero when the total is zero.
pub(crate) fn percent_of(value: Decimal, total: Decimal) -> Result<Decimal> {
    if total.is_zero() {
        Ok(Decimal::ZERO)
    } else {
        scaled(value, PERCENT_SCALE, total, "current percent")
    }
}

/// Builds the allocation snapshot for a list of holdings.
pub fn compute_snapshot(holdings: &[FundHolding]) -> Result<PortfolioSnapshot> {
    validate_holdings(holdings)?;
    build_snapshot(holdings)
}

fn build_snapshot(holdings: &[FundHolding]) -> Result<PortfolioSnapshot> {
    let total_current_value: Decimal = holdings.iter().map(|h| h.current_value).sum();

    let allocations = holdings
        .iter()
        .map(|holding| {
            let target_percent = holding.target_percent();
            Ok(FundAllocation {
                fund_id: holding.fund_id.clone(),
                current_value: holding.current_value,
                current_percent: percent_of(holding.current_value, total_current_value)?,
                target_percent,
                target_value: scaled(
                    target_percent,
                    total_current_value,
                    PERCENT_SCALE,
                    "target value",
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PortfolioSnapshot {
        total_current_value,
        allocations,
    })
}

/// Classifies a deviation against the threshold.
///
/// A fund with value but no target is always overweight: it is a full exit
/// candidate regardless of the threshold. A deviation exactly equal to the
/// threshold is balanced.
pub fn classify_deviation(
    current_percent: Decimal,
    target_percent: Decimal,
    threshold: Decimal,
) -> AllocationStatus {
    if target_percent.is_zero() && current_percent > Decimal::ZERO {
        return AllocationStatus::Overweight;
    }

    let deviation = current_percent - target_percent;
    if deviation.abs() <= threshold {
        AllocationStatus::Balanced
    } else if deviation > Decimal::ZERO {
        AllocationStatus::Overweight
    } else {
        AllocationStatus::Underweight
    }
}

/// Classifies one holding within a snapshot of its portfolio.
pub fn classify(
    holding: &FundHolding,
    snapshot: &PortfolioSnapshot,
    threshold: Decimal,
) -> Result<AllocationStatus> {
    holding.validate()?;
    let current_percent = percent_of(holding.current_value, snapshot.total_current_value)?;
    Ok(classify_deviation(current_percent, holding.target_percent(), threshold))
}

fn allocation_status(allocation: &FundAllocation, threshold: Decimal) -> AllocationStatus {
    classify_deviation(allocation.current_percent, allocation.target_percent, threshold)
}

// ============================================================================
// Buy / sell
// ============================================================================

fn buy_sell_amount(allocation: &FundAllocation, threshold: Decimal) -> Decimal {
    if allocation_status(allocation, threshold).is_actionable() {
        allocation.target_value - allocation.current_value
    } else {
        Decimal::ZERO
    }
}

/// Rebalance-to-target amounts for each fund. Positive = buy, negative = sell.
pub fn plan_buy_sell(
    holdings: &[FundHolding],
    threshold: Decimal,
) -> Result<BTreeMap<String, Decimal>> {
    validate_threshold(threshold)?;
    let snapshot = compute_snapshot(holdings)?;

    Ok(snapshot
        .allocations
        .iter()
        .map(|a| (a.fund_id.clone(), buy_sell_amount(a, threshold)))
        .collect())
}

// ============================================================================
// Gaps
// ============================================================================

/// Underweight shortfall of a fund, zero when at or above target.
pub fn fund_gap(allocation: &FundAllocation) -> Decimal {
    (allocation.target_value - allocation.current_value).max(Decimal::ZERO)
}

/// Sum of underweight gaps across the portfolio.
pub fn total_gap(snapshot: &PortfolioSnapshot) -> Decimal {
    snapshot.allocations.iter().map(fund_gap).sum()
}

// ============================================================================
// SIP
// ============================================================================

/// Splits SIP cash by underweight gap, or by target percent when nothing is underweight.
pub fn distribute_sip(
    snapshot: &PortfolioSnapshot,
    cash_amount: Decimal,
) -> Result<SipDistribution> {
    validate_cash_amount(cash_amount)?;
    let total_gap = total_gap(snapshot);

    if total_gap > Decimal::ZERO {
        let amounts = snapshot
            .allocations
            .iter()
            .map(|a| scaled(fund_gap(a), cash_amount, total_gap, "SIP amount"))
            .collect::<Result<Vec<_>>>()?;
        return Ok(SipDistribution {
            mode: SipMode::GapProportional,
            total_gap,
            amounts,
        });
    }

    let target_sum: Decimal = snapshot.allocations.iter().map(|a| a.target_percent).sum();
    if cash_amount > Decimal::ZERO && (target_sum - PERCENT_SCALE).abs() > TARGET_SUM_TOLERANCE {
        warn!(
            "Targets sum to {}% instead of 100%; SIP of {} will not be fully distributed",
            target_sum, cash_amount
        );
    }

    let amounts = snapshot
        .allocations
        .iter()
        .map(|a| scaled(a.target_percent, cash_amount, PERCENT_SCALE, "SIP amount"))
        .collect::<Result<Vec<_>>>()?;
    Ok(SipDistribution {
        mode: SipMode::TargetProportional,
        total_gap,
        amounts,
    })
}

/// SIP cash per fund.
///
/// The threshold is validated like the other planners take it, but plays no
/// part in the SIP split.
pub fn plan_sip(
    holdings: &[FundHolding],
    threshold: Decimal,
    cash_amount: Decimal,
) -> Result<BTreeMap<String, Decimal>> {
    validate_threshold(threshold)?;
    validate_cash_amount(cash_amount)?;
    let snapshot = compute_snapshot(holdings)?;
    let distribution = distribute_sip(&snapshot, cash_amount)?;

    Ok(snapshot
        .allocations
        .iter()
        .zip(distribution.amounts)
        .map(|(a, amount)| (a.fund_id.clone(), amount))
        .collect())
}

// ============================================================================
// Lumpsum
// ============================================================================

/// Splits lumpsum cash fund by fund.
///
/// Each fund's own deviation picks its formula, so the amounts need not add up
/// to `cash_amount`. The difference is reported as `residual` and left as is.
pub fn distribute_lumpsum(
    snapshot: &PortfolioSnapshot,
    threshold: Decimal,
    cash_amount: Decimal,
) -> Result<LumpsumDistribution> {
    validate_cash_amount(cash_amount)?;
    let post_injection_total = snapshot
        .total_current_value
        .checked_add(cash_amount)
        .ok_or_else(|| ValidationError::Overflow("post-injection total".to_string()))?;

    let amounts = snapshot
        .allocations
        .iter()
        .map(|a| {
            if a.deviation().abs() > threshold {
                let needed = scaled(
                    a.target_percent,
                    post_injection_total,
                    PERCENT_SCALE,
                    "lumpsum amount",
                )? - a.current_value;
                Ok((needed.max(Decimal::ZERO), LumpsumMode::Smart))
            } else {
                let amount =
                    scaled(a.target_percent, cash_amount, PERCENT_SCALE, "lumpsum amount")?;
                Ok((amount, LumpsumMode::Proportional))
            }
        })
        .collect::<Result<Vec<(Decimal, LumpsumMode)>>>()?;

    let distributed: Decimal = amounts.iter().map(|(amount, _)| *amount).sum();
    let residual = cash_amount - distributed;
    if !residual.is_zero() {
        debug!(
            "Lumpsum of {} distributed {} (residual {})",
            cash_amount, distributed, residual
        );
    }

    Ok(LumpsumDistribution { amounts, residual })
}

/// Lumpsum cash per fund.
pub fn plan_lumpsum(
    holdings: &[FundHolding],
    threshold: Decimal,
    cash_amount: Decimal,
) -> Result<BTreeMap<String, Decimal>> {
    validate_threshold(threshold)?;
    validate_cash_amount(cash_amount)?;
    let snapshot = compute_snapshot(holdings)?;
    let distribution = distribute_lumpsum(&snapshot, threshold, cash_amount)?;

    Ok(snapshot
        .allocations
        .iter()
        .zip(distribution.amounts)
        .map(|(a, (amount, _))| (a.fund_id.clone(), amount))
        .collect())
}

// ============================================================================
// Combined report
// ============================================================================

/// Runs the snapshot, classification and all configured recommendations for one portfolio.
pub fn build_recommendations(
    portfolio: &Portfolio,
    holdings: &[FundHolding],
) -> Result<PortfolioRecommendations> {
    portfolio.validate()?;
    let snapshot = compute_snapshot(holdings)?;
    let threshold = portfolio.rebalance_threshold;

    debug!(
        "Building recommendations for portfolio {} ({} holdings, total {})",
        portfolio.id,
        snapshot.allocations.len(),
        snapshot.total_current_value
    );

    let sip = portfolio
        .sip_amount
        .map(|cash| distribute_sip(&snapshot, cash))
        .transpose()?;
    let lumpsum = portfolio
        .lumpsum_amount
        .map(|cash| distribute_lumpsum(&snapshot, threshold, cash))
        .transpose()?;

    let funds: Vec<FundRecommendation> = snapshot
        .allocations
        .iter()
        .enumerate()
        .map(|(index, allocation)| {
            let lumpsum_entry = lumpsum.as_ref().map(|l| l.amounts[index]);
            FundRecommendation {
                fund_id: allocation.fund_id.clone(),
                current_value: allocation.current_value,
                current_percent: allocation.current_percent,
                target_percent: allocation.target_percent,
                target_value: allocation.target_value,
                deviation: allocation.deviation(),
                status: allocation_status(allocation, threshold),
                buy_sell_amount: buy_sell_amount(allocation, threshold),
                sip_amount: sip.as_ref().map(|s| s.amounts[index]),
                lumpsum_amount: lumpsum_entry.map(|(amount, _)| amount),
                lumpsum_mode: lumpsum_entry.map(|(_, mode)| mode),
            }
        })
        .collect();

    let needs_rebalancing = funds.iter().any(|f| f.status.is_actionable());
    let removal_candidates = holdings
        .iter()
        .filter(|h| h.is_removal_candidate())
        .map(|h| h.fund_id.clone())
        .collect();

    Ok(PortfolioRecommendations {
        portfolio_id: portfolio.id.clone(),
        threshold,
        total_current_value: snapshot.total_current_value,
        funds,
        needs_rebalancing,
        total_gap: total_gap(&snapshot),
        sip_mode: sip.as_ref().map(|s| s.mode),
        lumpsum_residual: lumpsum.map(|l| l.residual),
        removal_candidates,
    })
}
