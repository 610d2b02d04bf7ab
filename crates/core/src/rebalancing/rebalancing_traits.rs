use async_trait::async_trait;

use crate::alerts::RebalanceAlert;
use crate::errors::Result;
use crate::portfolios::{FundHolding, Portfolio};
use crate::settings::RebalanceSettings;

use super::rebalancing_model::{PortfolioRecommendations, PortfolioSnapshot};

/// Trait for rebalancing service operations
#[async_trait]
pub trait RebalancingServiceTrait: Send + Sync {
    /// Engine settings, including the default threshold for ad-hoc plans.
    fn settings(&self) -> &RebalanceSettings;

    async fn get_portfolios(&self) -> Result<Vec<Portfolio>>;
    async fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    async fn get_snapshot(&self, portfolio_id: &str) -> Result<PortfolioSnapshot>;
    async fn get_recommendations(&self, portfolio_id: &str) -> Result<PortfolioRecommendations>;

    /// Runs the engine on caller-supplied data without touching any provider.
    fn plan_for_holdings(
        &self,
        portfolio: &Portfolio,
        holdings: &[FundHolding],
    ) -> Result<PortfolioRecommendations>;

    /// Asset-class alerts across all portfolios, largest deviation first.
    async fn get_rebalance_alerts(&self) -> Result<Vec<RebalanceAlert>>;

    async fn invalidate_portfolio(&self, portfolio_id: &str);
    async fn invalidate_all(&self);
}
