//! Familyfolio Core - allocation and rebalancing engine.
//!
//! Given a portfolio's fund holdings and their target percentages, the engine
//! builds an allocation snapshot, classifies each fund against the portfolio's
//! rebalance threshold, and produces buy/sell, SIP and lumpsum
//! recommendations. It also aggregates asset-class alerts across portfolios.
//!
//! The crate performs no I/O. Portfolio data is read through the provider
//! traits in [`portfolios`], which callers implement.

pub mod alerts;
pub mod constants;
pub mod errors;
pub mod portfolios;
pub mod rebalancing;
pub mod settings;

pub use alerts::*;
pub use portfolios::*;
pub use rebalancing::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
