//! Alerts module - asset-class deviation alerts across portfolios.

mod alerts_calculator;
mod alerts_model;

pub use alerts_calculator::{compute_rebalance_alerts, compute_rebalance_alerts_with};
pub use alerts_model::{AlertAction, AlertPriority, AssetClassPortfolio, RebalanceAlert};
