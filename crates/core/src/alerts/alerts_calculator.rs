//! Computes asset-class rebalancing alerts.
//!
//! Same deviation test as the per-fund classifier, applied to holdings grouped
//! by asset class. Only asset classes with a configured target can alert.

use std::collections::{HashMap, HashSet};

use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};
use crate::rebalancing::{percent_of, validate_holdings};
use crate::settings::RebalanceSettings;

use super::alerts_model::{AlertAction, AlertPriority, AssetClassPortfolio, RebalanceAlert};

/// Alerts for all portfolios using default settings.
pub fn compute_rebalance_alerts(
    portfolios: &[AssetClassPortfolio],
) -> Result<Vec<RebalanceAlert>> {
    compute_rebalance_alerts_with(portfolios, &RebalanceSettings::default())
}

/// Alerts for all portfolios, sorted by absolute deviation (largest first).
///
/// The sort is stable: equal deviations keep portfolio order, then target order.
pub fn compute_rebalance_alerts_with(
    portfolios: &[AssetClassPortfolio],
    settings: &RebalanceSettings,
) -> Result<Vec<RebalanceAlert>> {
    let mut alerts = Vec::new();
    for input in portfolios {
        alerts.extend(portfolio_alerts(input, settings)?);
    }

    alerts.sort_by(|a, b| b.deviation.abs().cmp(&a.deviation.abs()));
    Ok(alerts)
}

fn portfolio_alerts(
    input: &AssetClassPortfolio,
    settings: &RebalanceSettings,
) -> Result<Vec<RebalanceAlert>> {
    let portfolio = &input.portfolio;
    portfolio.validate()?;
    validate_holdings(&input.holdings)?;

    let mut seen_classes = HashSet::new();
    for target in &input.targets {
        target.validate()?;
        if !seen_classes.insert(target.asset_class.as_str()) {
            return Err(ValidationError::InvalidInput(format!(
                "Asset class '{}' has more than one target in portfolio '{}'",
                target.asset_class, portfolio.id
            ))
            .into());
        }
    }

    let total: Decimal = input.holdings.iter().map(|h| h.current_value).sum();

    let mut class_values: HashMap<&str, Decimal> = HashMap::new();
    for holding in &input.holdings {
        let asset_class = input
            .fund_asset_classes
            .get(&holding.fund_id)
            .map(String::as_str)
            .unwrap_or(settings.unknown_asset_class_label.as_str());
        *class_values.entry(asset_class).or_insert(Decimal::ZERO) += holding.current_value;
    }

    let threshold = portfolio.rebalance_threshold;
    let mut alerts: Vec<RebalanceAlert> = Vec::new();
    for target in &input.targets {
        let value = class_values
            .get(target.asset_class.as_str())
            .copied()
            .unwrap_or(Decimal::ZERO);
        let current_percent = percent_of(value, total)?;
        let deviation = current_percent - target.target_percent;
        if deviation.abs() <= threshold {
            continue;
        }

        let action = if deviation > Decimal::ZERO {
            AlertAction::Reduce
        } else {
            AlertAction::Increase
        };
        let priority = if deviation.abs() > settings.high_priority_deviation {
            AlertPriority::High
        } else {
            AlertPriority::Medium
        };

        alerts.push(RebalanceAlert {
            portfolio_id: portfolio.id.clone(),
            portfolio_name: portfolio.name.clone(),
            asset_class: target.asset_class.clone(),
            current_percent,
            target_percent: target.target_percent,
            deviation,
            action,
            priority,
        });
    }

    debug!("Portfolio {} has {} asset-class alerts", portfolio.id, alerts.len());
    Ok(alerts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::portfolios::{AssetClassTarget, FundHolding, Portfolio};
    use rust_decimal_macros::dec;

    fn portfolio(id: &str, threshold: Decimal) -> Portfolio {
        Portfolio {
            id: id.to_string(),
            name: format!("{} portfolio", id),
            owner: None,
            rebalance_threshold: threshold,
            sip_amount: None,
            lumpsum_amount: None,
        }
    }

    fn input(
        portfolio: Portfolio,
        holdings: Vec<(&str, Decimal, &str)>,
        targets: Vec<(&str, Decimal)>,
    ) -> AssetClassPortfolio {
        AssetClassPortfolio {
            portfolio,
            fund_asset_classes: holdings
                .iter()
                .filter(|(_, _, class)| !class.is_empty())
                .map(|(fund, _, class)| (fund.to_string(), class.to_string()))
                .collect(),
            holdings: holdings
                .iter()
                .map(|(fund, value, _)| FundHolding::new(*fund, *value, None))
                .collect(),
            targets: targets
                .into_iter()
                .map(|(class, pct)| AssetClassTarget::new(class, pct))
                .collect(),
        }
    }

    #[test]
    fn emits_reduce_and_increase_outside_threshold() {
        // Equity 70%, Debt 30% against 60/40 targets with a 5pp threshold
        let data = input(
            portfolio("p1", dec!(5)),
            vec![
                ("eq1", dec!(400), "EQUITY"),
                ("eq2", dec!(300), "EQUITY"),
                ("debt", dec!(300), "DEBT"),
            ],
            vec![("EQUITY", dec!(60)), ("DEBT", dec!(40))],
        );

        let alerts = compute_rebalance_alerts(&[data]).unwrap();
        assert_eq!(alerts.len(), 2);

        let equity = alerts.iter().find(|a| a.asset_class == "EQUITY").unwrap();
        assert_eq!(equity.current_percent, dec!(70));
        assert_eq!(equity.deviation, dec!(10));
        assert_eq!(equity.action, AlertAction::Reduce);
        // Exactly 10pp is not above the HIGH cut-off
        assert_eq!(equity.priority, AlertPriority::Medium);

        let debt = alerts.iter().find(|a| a.asset_class == "DEBT").unwrap();
        assert_eq!(debt.deviation, dec!(-10));
        assert_eq!(debt.action, AlertAction::Increase);
    }

    #[test]
    fn deviation_equal_to_threshold_does_not_alert() {
        let data = input(
            portfolio("p1", dec!(5)),
            vec![("eq", dec!(55), "EQUITY"), ("debt", dec!(45), "DEBT")],
            vec![("EQUITY", dec!(50)), ("DEBT", dec!(50))],
        );
        assert!(compute_rebalance_alerts(&[data]).unwrap().is_empty());
    }

    #[test]
    fn high_priority_above_ten_points() {
        let data = input(
            portfolio("p1", dec!(5)),
            vec![("eq", dec!(800), "EQUITY"), ("debt", dec!(200), "DEBT")],
            vec![("EQUITY", dec!(60)), ("DEBT", dec!(40))],
        );
        let alerts = compute_rebalance_alerts(&[data]).unwrap();
        assert!(alerts.iter().all(|a| a.priority == AlertPriority::High));
    }

    #[test]
    fn high_priority_cutoff_follows_settings() {
        let data = input(
            portfolio("p1", dec!(5)),
            vec![("eq", dec!(680), "EQUITY"), ("debt", dec!(320), "DEBT")],
            vec![("EQUITY", dec!(60)), ("DEBT", dec!(40))],
        );
        let settings = RebalanceSettings {
            high_priority_deviation: dec!(7.5),
            ..Default::default()
        };
        let alerts = compute_rebalance_alerts_with(&[data], &settings).unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.priority == AlertPriority::High));
    }

    #[test]
    fn sorts_by_absolute_deviation_across_portfolios() {
        let small = input(
            portfolio("small", dec!(2)),
            vec![("eq", dec!(530), "EQUITY"), ("debt", dec!(470), "DEBT")],
            vec![("EQUITY", dec!(50))],
        );
        let large = input(
            portfolio("large", dec!(2)),
            vec![("eq", dec!(200), "EQUITY"), ("debt", dec!(800), "DEBT")],
            vec![("EQUITY", dec!(50)), ("DEBT", dec!(45))],
        );

        let alerts = compute_rebalance_alerts(&[small, large]).unwrap();
        let deviations: Vec<Decimal> = alerts.iter().map(|a| a.deviation).collect();
        assert_eq!(deviations, vec![dec!(35), dec!(-30), dec!(3)]);
        assert_eq!(alerts[0].portfolio_id, "large");
        assert_eq!(alerts[0].asset_class, "DEBT");
        assert_eq!(alerts[2].portfolio_id, "small");
    }

    #[test]
    fn unmapped_funds_group_under_unknown() {
        let data = input(
            portfolio("p1", dec!(5)),
            vec![("eq", dec!(500), "EQUITY"), ("mystery", dec!(500), "")],
            vec![("EQUITY", dec!(100)), ("UNKNOWN", dec!(0))],
        );
        let alerts = compute_rebalance_alerts(&[data]).unwrap();
        let unknown = alerts.iter().find(|a| a.asset_class == "UNKNOWN").unwrap();
        assert_eq!(unknown.current_percent, dec!(50));
        assert_eq!(unknown.action, AlertAction::Reduce);
    }

    #[test]
    fn classes_without_target_are_ignored() {
        let data = input(
            portfolio("p1", dec!(5)),
            vec![("eq", dec!(500), "EQUITY"), ("gold", dec!(500), "COMMODITY")],
            vec![("EQUITY", dec!(50))],
        );
        assert!(compute_rebalance_alerts(&[data]).unwrap().is_empty());
    }

    #[test]
    fn empty_portfolio_reads_as_zero_percent() {
        let data = input(
            portfolio("p1", dec!(5)),
            vec![("eq", dec!(0), "EQUITY")],
            vec![("EQUITY", dec!(60))],
        );
        let alerts = compute_rebalance_alerts(&[data]).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].current_percent, Decimal::ZERO);
        assert_eq!(alerts[0].action, AlertAction::Increase);
        assert_eq!(alerts[0].priority, AlertPriority::High);
    }

    #[test]
    fn rejects_duplicate_class_targets() {
        let data = input(
            portfolio("p1", dec!(5)),
            vec![("eq", dec!(100), "EQUITY")],
            vec![("EQUITY", dec!(50)), ("EQUITY", dec!(50))],
        );
        assert!(matches!(
            compute_rebalance_alerts(&[data]),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
    }
}
