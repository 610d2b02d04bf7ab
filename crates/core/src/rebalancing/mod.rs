//! Rebalancing module - allocation snapshot, deviation classification and
//! the buy/sell, SIP and lumpsum recommendations built on them.
//!
//! ```text
//! holdings ──► compute_snapshot ──► classify ──┬─► plan_buy_sell
//!                                              ├─► plan_sip      (gap-proportional)
//!                                              └─► plan_lumpsum  (threshold-gated)
//! ```
//!
//! The calculator functions are pure. `RebalancingService` wraps them with
//! provider lookups and the portfolio cache.

mod rebalancing_calculator;
mod rebalancing_model;
mod rebalancing_service;
mod rebalancing_traits;


pub use rebalancing_calculator::{
    build_recommendations, classify, classify_deviation, compute_snapshot, distribute_lumpsum,
    distribute_sip, fund_gap, plan_buy_sell, plan_lumpsum, plan_sip, total_gap,
    validate_holdings,
};
pub(crate) use rebalancing_calculator::percent_of;
pub use rebalancing_model::*;
pub use rebalancing_service::RebalancingService;
pub use rebalancing_traits::RebalancingServiceTrait;
