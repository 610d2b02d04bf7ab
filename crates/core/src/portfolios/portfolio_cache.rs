//! Read-through cache for portfolio metadata lookups.
//!
//! The cache is an explicit object owned by whoever needs it (normally the
//! rebalancing service). Entries live until they are invalidated; there is no
//! expiry, so callers that change portfolio metadata must invalidate.
//!
//! Loads race with invalidation: a value fetched before an invalidation must
//! not land in the cache after it. Callers capture [`PortfolioCache::generation`]
//! before fetching and hand it back on insert; stale inserts are dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use log::debug;
use tokio::sync::RwLock;

use super::portfolios_model::Portfolio;

/// Cached portfolio metadata keyed by portfolio id.
#[derive(Default)]
pub struct PortfolioCache {
    /// Individual lookups
    entries: DashMap<String, Portfolio>,

    /// Full listing in provider order, present only after a complete load
    listing: RwLock<Option<Vec<Portfolio>>>,

    /// Bumped on every invalidation, always under the listing write lock
    generation: AtomicU64,
}

impl PortfolioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, portfolio_id: &str) -> Option<Portfolio> {
        self.entries.get(portfolio_id).map(|entry| entry.value().clone())
    }

    /// Current invalidation generation. Capture it before loading from a provider.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Stores a portfolio loaded at `generation`. Returns false and stores
    /// nothing if the cache was invalidated since.
    pub async fn insert(&self, portfolio: Portfolio, generation: u64) -> bool {
        let _listing = self.listing.write().await;
        if self.generation() != generation {
            debug!("Dropped stale load of portfolio {}", portfolio.id);
            return false;
        }
        self.entries.insert(portfolio.id.clone(), portfolio);
        true
    }

    /// Returns the full listing if one has been stored since the last invalidation.
    pub async fn all(&self) -> Option<Vec<Portfolio>> {
        self.listing.read().await.clone()
    }

    /// Replaces every entry with a listing loaded at `generation`. Returns
    /// false and stores nothing if the cache was invalidated since.
    pub async fn replace_all(&self, portfolios: Vec<Portfolio>, generation: u64) -> bool {
        let mut listing = self.listing.write().await;
        if self.generation() != generation {
            debug!("Dropped stale portfolio listing");
            return false;
        }
        self.entries.clear();
        for portfolio in &portfolios {
            self.entries.insert(portfolio.id.clone(), portfolio.clone());
        }
        *listing = Some(portfolios);
        true
    }

    /// Drops one portfolio. The full listing is dropped too since it holds a copy.
    pub async fn invalidate(&self, portfolio_id: &str) {
        let mut listing = self.listing.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.remove(portfolio_id);
        *listing = None;
        debug!("Invalidated cached portfolio {}", portfolio_id);
    }

    pub async fn clear(&self) {
        let mut listing = self.listing.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.clear();
        *listing = None;
        debug!("Cleared portfolio cache");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
