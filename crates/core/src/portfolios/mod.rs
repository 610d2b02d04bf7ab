//! Portfolios module - metadata, holdings, provider traits and the lookup cache.

mod portfolio_cache;
mod portfolios_model;
mod portfolios_traits;

pub use portfolio_cache::PortfolioCache;
pub use portfolios_model::{
    validate_cash_amount, validate_threshold, AssetClassTarget, FundHolding, Portfolio,
};
pub use portfolios_traits::{
    AssetClassProviderTrait, HoldingsProviderTrait, PortfolioProviderTrait,
};
