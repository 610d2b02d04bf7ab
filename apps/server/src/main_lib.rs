use std::sync::Arc;

use crate::{config::Config, store::FilePortfolioStore};
use familyfolio_core::rebalancing::{RebalancingService, RebalancingServiceTrait};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub rebalancing_service: Arc<dyn RebalancingServiceTrait + Send + Sync>,
    pub store: Arc<FilePortfolioStore>,
}

pub fn init_tracing() {
    let log_format = std::env::var("FF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Arc::new(
        FilePortfolioStore::open(&config.portfolio_file, config.settings.default_threshold)
            .await?,
    );
    tracing::info!("Portfolio file in use: {}", store.path().display());

    let rebalancing_service = Arc::new(RebalancingService::with_settings(
        store.clone(),
        store.clone(),
        store.clone(),
        config.settings.clone(),
    ));

    Ok(Arc::new(AppState {
        rebalancing_service,
        store,
    }))
}
