//! JSON-file-backed portfolio store.
//!
//! The whole file is read into memory on open and on every reload. Requests
//! are served from memory, so edits to the file are only picked up by an
//! explicit reload.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use familyfolio_core::{
    errors::{Error, ValidationError},
    portfolios::{
        AssetClassProviderTrait, AssetClassTarget, FundHolding, HoldingsProviderTrait, Portfolio,
        PortfolioProviderTrait,
    },
    Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreFile {
    #[serde(default)]
    pub portfolios: Vec<StoredPortfolio>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPortfolio {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// Falls back to the configured default threshold when absent
    #[serde(default)]
    pub rebalance_threshold: Option<Decimal>,
    #[serde(default)]
    pub sip_amount: Option<Decimal>,
    #[serde(default)]
    pub lumpsum_amount: Option<Decimal>,
    #[serde(default)]
    pub holdings: Vec<StoredHolding>,
    #[serde(default)]
    pub asset_class_targets: Vec<AssetClassTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredHolding {
    pub fund_id: String,
    pub current_value: Decimal,
    #[serde(default)]
    pub target_percent: Option<Decimal>,
    #[serde(default)]
    pub asset_class: Option<String>,
}

#[derive(Default)]
struct StoreData {
    /// Portfolio ids in file order
    order: Vec<String>,
    portfolios: HashMap<String, StoredPortfolio>,
}

pub struct FilePortfolioStore {
    path: PathBuf,
    default_threshold: Decimal,
    data: RwLock<StoreData>,
}

impl FilePortfolioStore {
    /// Opens the store and loads the file. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>, default_threshold: Decimal) -> Result<Self> {
        let path = path.into();
        let data = load_file(&path).await?;
        tracing::info!(
            "Loaded {} portfolios from {}",
            data.order.len(),
            path.display()
        );
        Ok(Self {
            path,
            default_threshold,
            data: RwLock::new(data),
        })
    }

    /// Re-reads the file. On failure the previously loaded data is kept.
    pub async fn reload(&self) -> Result<usize> {
        let fresh = load_file(&self.path).await?;
        let count = fresh.order.len();
        *self.data.write().await = fresh;
        tracing::info!("Reloaded {} portfolios from {}", count, self.path.display());
        Ok(count)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_portfolio(&self, stored: &StoredPortfolio) -> Portfolio {
        Portfolio {
            id: stored.id.clone(),
            name: stored.name.clone(),
            owner: stored.owner.clone(),
            rebalance_threshold: stored
                .rebalance_threshold
                .unwrap_or(self.default_threshold),
            sip_amount: stored.sip_amount,
            lumpsum_amount: stored.lumpsum_amount,
        }
    }
}

async fn load_file(path: &Path) -> Result<StoreData> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                "Portfolio file {} does not exist; starting empty",
                path.display()
            );
            return Ok(StoreData::default());
        }
        Err(e) => {
            return Err(Error::Provider(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let file: StoreFile = serde_json::from_slice(&raw)
        .map_err(|e| Error::Provider(format!("Failed to parse {}: {}", path.display(), e)))?;

    let mut data = StoreData::default();
    let mut seen = HashSet::new();
    for portfolio in file.portfolios {
        if !seen.insert(portfolio.id.clone()) {
            return Err(ValidationError::InvalidInput(format!(
                "Portfolio '{}' appears more than once in {}",
                portfolio.id,
                path.display()
            ))
            .into());
        }
        data.order.push(portfolio.id.clone());
        data.portfolios.insert(portfolio.id.clone(), portfolio);
    }
    Ok(data)
}

#[async_trait]
impl PortfolioProviderTrait for FilePortfolioStore {
    async fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        let data = self.data.read().await;
        Ok(data
            .order
            .iter()
            .filter_map(|id| data.portfolios.get(id))
            .map(|p| self.to_portfolio(p))
            .collect())
    }

    async fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<Portfolio>> {
        let data = self.data.read().await;
        Ok(data
            .portfolios
            .get(portfolio_id)
            .map(|p| self.to_portfolio(p)))
    }
}

#[async_trait]
impl HoldingsProviderTrait for FilePortfolioStore {
    async fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<FundHolding>> {
        let data = self.data.read().await;
        let portfolio = data
            .portfolios
            .get(portfolio_id)
            .ok_or_else(|| Error::NotFound(format!("Portfolio '{}'", portfolio_id)))?;
        Ok(portfolio
            .holdings
            .iter()
            .map(|h| FundHolding::new(h.fund_id.clone(), h.current_value, h.target_percent))
            .collect())
    }
}

#[async_trait]
impl AssetClassProviderTrait for FilePortfolioStore {
    async fn get_fund_asset_classes(&self, portfolio_id: &str) -> Result<HashMap<String, String>> {
        let data = self.data.read().await;
        Ok(data
            .portfolios
            .get(portfolio_id)
            .map(|p| {
                p.holdings
                    .iter()
                    .filter_map(|h| {
                        h.asset_class
                            .as_ref()
                            .map(|class| (h.fund_id.clone(), class.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_asset_class_targets(&self, portfolio_id: &str) -> Result<Vec<AssetClassTarget>> {
        let data = self.data.read().await;
        Ok(data
            .portfolios
            .get(portfolio_id)
            .map(|p| p.asset_class_targets.clone())
            .unwrap_or_default())
    }
}
