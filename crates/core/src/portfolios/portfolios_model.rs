//! Portfolio domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_AMOUNT, PERCENT_SCALE};
use crate::errors::{Result, ValidationError};

/// Portfolio metadata: who owns it and how it should be rebalanced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    /// Family member the portfolio belongs to
    pub owner: Option<String>,
    /// Minimum absolute deviation (percentage points) before a buy/sell is recommended
    pub rebalance_threshold: Decimal,
    /// Recurring SIP cash to distribute, if configured
    pub sip_amount: Option<Decimal>,
    /// One-time lumpsum cash to distribute, if configured
    pub lumpsum_amount: Option<Decimal>,
}

impl Portfolio {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(
                ValidationError::InvalidInput("Portfolio id cannot be empty".to_string()).into(),
            );
        }
        validate_threshold(self.rebalance_threshold)?;
        if let Some(sip) = self.sip_amount {
            validate_cash_amount(sip)?;
        }
        if let Some(lumpsum) = self.lumpsum_amount {
            validate_cash_amount(lumpsum)?;
        }
        Ok(())
    }
}

/// One fund position inside one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundHolding {
    pub fund_id: String,
    /// Present market value of the position
    pub current_value: Decimal,
    /// Desired share of the portfolio (0-100). `None` means the fund is not part of the plan.
    #[serde(default)]
    pub target_percent: Option<Decimal>,
}

impl FundHolding {
    pub fn new(
        fund_id: impl Into<String>,
        current_value: Decimal,
        target_percent: Option<Decimal>,
    ) -> Self {
        Self {
            fund_id: fund_id.into(),
            current_value,
            target_percent,
        }
    }

    /// Effective target; an absent target counts as zero.
    pub fn target_percent(&self) -> Decimal {
        self.target_percent.unwrap_or(Decimal::ZERO)
    }

    pub fn has_target(&self) -> bool {
        self.target_percent() > Decimal::ZERO
    }

    /// A fund that was dropped from the plan and holds nothing can be removed by the caller.
    pub fn is_removal_candidate(&self) -> bool {
        self.current_value.is_zero() && !self.has_target()
    }

    pub fn validate(&self) -> Result<()> {
        if self.fund_id.trim().is_empty() {
            return Err(
                ValidationError::InvalidInput("Fund id cannot be empty".to_string()).into(),
            );
        }
        if self.current_value < Decimal::ZERO {
            return Err(ValidationError::NegativeValue {
                fund_id: self.fund_id.clone(),
                value: self.current_value,
            }
            .into());
        }
        if self.current_value > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge {
                name: format!("Current value of fund '{}'", self.fund_id),
                value: self.current_value,
                max: MAX_AMOUNT,
            }
            .into());
        }
        if let Some(target) = self.target_percent {
            if !is_percent(target) {
                return Err(ValidationError::TargetOutOfRange {
                    fund_id: self.fund_id.clone(),
                    target,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Target share of a portfolio for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassTarget {
    pub asset_class: String,
    pub target_percent: Decimal,
}

impl AssetClassTarget {
    pub fn new(asset_class: impl Into<String>, target_percent: Decimal) -> Self {
        Self {
            asset_class: asset_class.into(),
            target_percent,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.asset_class.trim().is_empty() {
            return Err(
                ValidationError::InvalidInput("Asset class cannot be empty".to_string()).into(),
            );
        }
        if !is_percent(self.target_percent) {
            return Err(ValidationError::InvalidInput(format!(
                "Target percent for asset class '{}' must be between 0 and 100",
                self.asset_class
            ))
            .into());
        }
        Ok(())
    }
}

fn is_percent(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= PERCENT_SCALE
}

pub fn validate_threshold(threshold: Decimal) -> Result<()> {
    if !is_percent(threshold) {
        return Err(ValidationError::InvalidThreshold(threshold).into());
    }
    Ok(())
}

pub fn validate_cash_amount(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeCashAmount(amount).into());
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            name: "Cash amount".to_string(),
            value: amount,
            max: MAX_AMOUNT,
        }
        .into());
    }
    Ok(())
}
