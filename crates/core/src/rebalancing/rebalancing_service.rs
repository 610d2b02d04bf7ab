use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::alerts::{compute_rebalance_alerts_with, AssetClassPortfolio, RebalanceAlert};
use crate::errors::{Error, Result};
use crate::portfolios::{
    AssetClassProviderTrait, FundHolding, HoldingsProviderTrait, Portfolio, PortfolioCache,
    PortfolioProviderTrait,
};
use crate::settings::RebalanceSettings;

use super::rebalancing_calculator::{build_recommendations, compute_snapshot};
use super::rebalancing_model::{PortfolioRecommendations, PortfolioSnapshot};
use super::rebalancing_traits::RebalancingServiceTrait;

/// Loads portfolio data through the providers and runs the engine on it.
///
/// Portfolio metadata goes through a read-through cache; holdings are always
/// read fresh so every computation sees the provider's current snapshot.
pub struct RebalancingService {
    portfolio_provider: Arc<dyn PortfolioProviderTrait>,
    holdings_provider: Arc<dyn HoldingsProviderTrait>,
    asset_class_provider: Arc<dyn AssetClassProviderTrait>,
    cache: PortfolioCache,
    settings: RebalanceSettings,
}

impl RebalancingService {
    pub fn new(
        portfolio_provider: Arc<dyn PortfolioProviderTrait>,
        holdings_provider: Arc<dyn HoldingsProviderTrait>,
        asset_class_provider: Arc<dyn AssetClassProviderTrait>,
    ) -> Self {
        Self::with_settings(
            portfolio_provider,
            holdings_provider,
            asset_class_provider,
            RebalanceSettings::default(),
        )
    }

    pub fn with_settings(
        portfolio_provider: Arc<dyn PortfolioProviderTrait>,
        holdings_provider: Arc<dyn HoldingsProviderTrait>,
        asset_class_provider: Arc<dyn AssetClassProviderTrait>,
        settings: RebalanceSettings,
    ) -> Self {
        Self {
            portfolio_provider,
            holdings_provider,
            asset_class_provider,
            cache: PortfolioCache::new(),
            settings,
        }
    }

    async fn load_asset_class_portfolio(&self, portfolio: Portfolio) -> Result<AssetClassPortfolio> {
        let holdings = self.holdings_provider.get_holdings(&portfolio.id).await?;
        let fund_asset_classes = self
            .asset_class_provider
            .get_fund_asset_classes(&portfolio.id)
            .await?;
        let targets = self
            .asset_class_provider
            .get_asset_class_targets(&portfolio.id)
            .await?;

        Ok(AssetClassPortfolio {
            portfolio,
            holdings,
            fund_asset_classes,
            targets,
        })
    }
}

#[async_trait]
impl RebalancingServiceTrait for RebalancingService {
    fn settings(&self) -> &RebalanceSettings {
        &self.settings
    }

    async fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        if let Some(portfolios) = self.cache.all().await {
            return Ok(portfolios);
        }

        let generation = self.cache.generation();
        let portfolios = self.portfolio_provider.get_portfolios().await?;
        debug!("Loaded {} portfolios from provider", portfolios.len());
        self.cache.replace_all(portfolios.clone(), generation).await;
        Ok(portfolios)
    }

    async fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        if let Some(portfolio) = self.cache.get(portfolio_id) {
            return Ok(portfolio);
        }

        let generation = self.cache.generation();
        let portfolio = self
            .portfolio_provider
            .get_portfolio(portfolio_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Portfolio '{}'", portfolio_id)))?;
        self.cache.insert(portfolio.clone(), generation).await;
        Ok(portfolio)
    }

    async fn get_snapshot(&self, portfolio_id: &str) -> Result<PortfolioSnapshot> {
        let portfolio = self.get_portfolio(portfolio_id).await?;
        let holdings = self.holdings_provider.get_holdings(&portfolio.id).await?;
        compute_snapshot(&holdings)
    }

    async fn get_recommendations(&self, portfolio_id: &str) -> Result<PortfolioRecommendations> {
        let portfolio = self.get_portfolio(portfolio_id).await?;
        let holdings = self.holdings_provider.get_holdings(&portfolio.id).await?;
        build_recommendations(&portfolio, &holdings)
    }

    fn plan_for_holdings(
        &self,
        portfolio: &Portfolio,
        holdings: &[FundHolding],
    ) -> Result<PortfolioRecommendations> {
        build_recommendations(portfolio, holdings)
    }

    async fn get_rebalance_alerts(&self) -> Result<Vec<RebalanceAlert>> {
        let portfolios = self.get_portfolios().await?;

        let mut inputs = Vec::with_capacity(portfolios.len());
        for portfolio in portfolios {
            inputs.push(self.load_asset_class_portfolio(portfolio).await?);
        }

        let alerts = compute_rebalance_alerts_with(&inputs, &self.settings)?;
        debug!(
            "Computed {} rebalance alerts across {} portfolios",
            alerts.len(),
            inputs.len()
        );
        Ok(alerts)
    }

    async fn invalidate_portfolio(&self, portfolio_id: &str) {
        self.cache.invalidate(portfolio_id).await;
        info!("Portfolio {} invalidated", portfolio_id);
    }

    async fn invalidate_all(&self) {
        let dropped = self.cache.len();
        self.cache.clear().await;
        info!("All cached portfolios invalidated ({} entries)", dropped);
    }
}
