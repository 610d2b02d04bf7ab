use familyfolio_core::portfolios::{FundHolding, Portfolio};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Portfolio settings for an ad-hoc plan. Everything but the cash amounts is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPortfolio {
    pub id: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub rebalance_threshold: Option<Decimal>,
    pub sip_amount: Option<Decimal>,
    pub lumpsum_amount: Option<Decimal>,
}

impl PlanPortfolio {
    pub fn into_portfolio(self, default_threshold: Decimal) -> Portfolio {
        let id = self.id.unwrap_or_else(|| "adhoc".to_string());
        Portfolio {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            owner: self.owner,
            rebalance_threshold: self.rebalance_threshold.unwrap_or(default_threshold),
            sip_amount: self.sip_amount,
            lumpsum_amount: self.lumpsum_amount,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub portfolio: PlanPortfolio,
    pub holdings: Vec<FundHolding>,
}
