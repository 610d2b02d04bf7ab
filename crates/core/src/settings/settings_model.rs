//! Tunable defaults for the rebalancing engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HIGH_PRIORITY_DEVIATION, DEFAULT_REBALANCE_THRESHOLD, PERCENT_SCALE,
    UNKNOWN_ASSET_CLASS,
};
use crate::errors::{Error, Result};

/// Configuration for rebalancing decisions.
///
/// Portfolios carry their own threshold; `default_threshold` is only used for
/// portfolios created without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RebalanceSettings {
    /// Threshold applied when a portfolio does not set one (default: 5pp)
    pub default_threshold: Decimal,

    /// Absolute asset-class deviation above which an alert is HIGH priority (default: 10pp)
    pub high_priority_deviation: Decimal,

    /// Asset class assigned to funds without a grouping (default: "UNKNOWN")
    pub unknown_asset_class_label: String,
}

impl Default for RebalanceSettings {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_REBALANCE_THRESHOLD,
            high_priority_deviation: DEFAULT_HIGH_PRIORITY_DEVIATION,
            unknown_asset_class_label: UNKNOWN_ASSET_CLASS.to_string(),
        }
    }
}

impl RebalanceSettings {
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: Decimal| v >= Decimal::ZERO && v <= PERCENT_SCALE;
        if !in_range(self.default_threshold) {
            return Err(Error::InvalidConfigValue(format!(
                "default_threshold must be between 0 and 100, got {}",
                self.default_threshold
            )));
        }
        if !in_range(self.high_priority_deviation) {
            return Err(Error::InvalidConfigValue(format!(
                "high_priority_deviation must be between 0 and 100, got {}",
                self.high_priority_deviation
            )));
        }
        if self.unknown_asset_class_label.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "unknown_asset_class_label cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
