//! Asset-class rebalancing alert models.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolios::{AssetClassTarget, FundHolding, Portfolio};

/// Direction the asset class needs to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertAction {
    Reduce,
    Increase,
}

/// Alert urgency. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    Medium,
    High,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::Medium => "MEDIUM",
            AlertPriority::High => "HIGH",
        }
    }
}

impl std::fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An asset class whose share of a portfolio is outside the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceAlert {
    pub portfolio_id: String,
    pub portfolio_name: String,
    pub asset_class: String,
    pub current_percent: Decimal,
    pub target_percent: Decimal,
    /// Current minus target, in percentage points
    pub deviation: Decimal,
    pub action: AlertAction,
    pub priority: AlertPriority,
}

/// Everything needed to evaluate one portfolio's asset-class alerts.
#[derive(Debug, Clone)]
pub struct AssetClassPortfolio {
    pub portfolio: Portfolio,
    pub holdings: Vec<FundHolding>,
    /// Fund id to asset-class label
    pub fund_asset_classes: HashMap<String, String>,
    pub targets: Vec<AssetClassTarget>,
}
