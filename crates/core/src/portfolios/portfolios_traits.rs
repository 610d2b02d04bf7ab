//! Provider traits for portfolio data owned outside the engine.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::Result;

use super::portfolios_model::{AssetClassTarget, FundHolding, Portfolio};

/// Supplies portfolio metadata: threshold and configured cash amounts.
#[async_trait]
pub trait PortfolioProviderTrait: Send + Sync {
    async fn get_portfolios(&self) -> Result<Vec<Portfolio>>;
    async fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<Portfolio>>;
}

/// Supplies the ordered holdings of a portfolio.
#[async_trait]
pub trait HoldingsProviderTrait: Send + Sync {
    async fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<FundHolding>>;
}

/// Supplies asset-class groupings and asset-class targets for alerts.
#[async_trait]
pub trait AssetClassProviderTrait: Send + Sync {
    /// Map of fund id to asset-class label. Funds missing from the map are unclassified.
    async fn get_fund_asset_classes(&self, portfolio_id: &str) -> Result<HashMap<String, String>>;

    async fn get_asset_class_targets(&self, portfolio_id: &str) -> Result<Vec<AssetClassTarget>>;
}
