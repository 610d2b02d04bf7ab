//! Rebalancing models: the allocation snapshot and recommendation outputs.
//!
//! Everything here is derived from holdings on every call and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current and target position of one fund within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundAllocation {
    pub fund_id: String,
    pub current_value: Decimal,
    /// Share of the portfolio total (0-100), zero for an empty portfolio
    pub current_percent: Decimal,
    /// Effective target (0-100), zero when the fund has no target
    pub target_percent: Decimal,
    /// Target share applied to the current portfolio total
    pub target_value: Decimal,
}

impl FundAllocation {
    /// Signed deviation in percentage points: current minus target.
    pub fn deviation(&self) -> Decimal {
        self.current_percent - self.target_percent
    }
}

/// Point-in-time allocation of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub total_current_value: Decimal,
    /// One entry per holding, in input order
    pub allocations: Vec<FundAllocation>,
}

impl PortfolioSnapshot {
    pub fn allocation(&self, fund_id: &str) -> Option<&FundAllocation> {
        self.allocations.iter().find(|a| a.fund_id == fund_id)
    }
}

/// Classification of a fund against its target and the portfolio threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    Balanced,
    Overweight,
    Underweight,
}

impl AllocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::Balanced => "BALANCED",
            AllocationStatus::Overweight => "OVERWEIGHT",
            AllocationStatus::Underweight => "UNDERWEIGHT",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, AllocationStatus::Balanced)
    }
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which SIP distribution branch produced the amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SipMode {
    /// Cash split in proportion to each fund's underweight gap
    GapProportional,
    /// No gaps: cash split by target percent
    TargetProportional,
}

/// Which lumpsum formula a fund used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LumpsumMode {
    /// Deviation beyond threshold: top up to target share of the post-injection total
    Smart,
    /// Within threshold: target share of the new cash
    Proportional,
}

/// SIP amounts per fund together with the branch that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SipDistribution {
    pub mode: SipMode,
    pub total_gap: Decimal,
    /// One amount per snapshot allocation, in snapshot order
    pub amounts: Vec<Decimal>,
}

/// Lumpsum amounts per fund with the formula each one used.
#[derive(Debug, Clone, PartialEq)]
pub struct LumpsumDistribution {
    /// One `(amount, mode)` pair per snapshot allocation, in snapshot order
    pub amounts: Vec<(Decimal, LumpsumMode)>,
    /// Cash minus the sum of amounts. Non-zero when formulas are mixed.
    pub residual: Decimal,
}

/// Combined recommendation row for one fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRecommendation {
    pub fund_id: String,
    pub current_value: Decimal,
    pub current_percent: Decimal,
    pub target_percent: Decimal,
    pub target_value: Decimal,
    pub deviation: Decimal,
    pub status: AllocationStatus,
    /// Positive = buy, negative = sell
    pub buy_sell_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lumpsum_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lumpsum_mode: Option<LumpsumMode>,
}

/// All recommendations for one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecommendations {
    pub portfolio_id: String,
    pub threshold: Decimal,
    pub total_current_value: Decimal,
    pub funds: Vec<FundRecommendation>,
    /// True when at least one fund is outside the threshold
    pub needs_rebalancing: bool,
    /// Sum of underweight gaps
    pub total_gap: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip_mode: Option<SipMode>,
    /// Lumpsum cash left unassigned (or over-assigned when negative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lumpsum_residual: Option<Decimal>,
    /// Funds with zero value and no target
    pub removal_candidates: Vec<String>,
}

impl PortfolioRecommendations {
    pub fn fund(&self, fund_id: &str) -> Option<&FundRecommendation> {
        self.funds.iter().find(|f| f.fund_id == fund_id)
    }
}
