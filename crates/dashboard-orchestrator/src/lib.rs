//! Dashboard orchestrator
//!
//! Loads the seven datasets for a symbol concurrently, normalizes each one
//! and assembles a [`DashboardSnapshot`]. Normalized results are cached per
//! `(symbol, dataset)` for the configured TTL.

pub mod session;
pub mod snapshot;

pub use session::DashboardSession;
pub use snapshot::{DashboardRequest, DashboardSnapshot, Section};

use chrono::{DateTime, Utc};
use dashboard_core::{DashboardConfig, DashboardError, EndpointKind, Normalized, Symbol};
use dashmap::DashMap;
use market_data_client::MarketDataClient;
use statement_normalizer::Normalizer;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Internal cache entry with timestamp
struct CacheEntry {
    data: Normalized,
    cached_at: DateTime<Utc>,
}

pub struct DashboardOrchestrator {
    client: MarketDataClient,
    normalizer: Normalizer,
    /// Bounds outbound requests across concurrent loads.
    permits: Arc<Semaphore>,
    /// Normalized datasets per (symbol, kind)
    cache: DashMap<(Symbol, EndpointKind), CacheEntry>,
    cache_ttl_secs: i64,
}

impl DashboardOrchestrator {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_client(MarketDataClient::from_config(config), config)
    }

    /// Use a prebuilt client, e.g. one routed to other providers.
    pub fn with_client(client: MarketDataClient, config: &DashboardConfig) -> Self {
        Self {
            client,
            normalizer: Normalizer::new(config.price_window),
            permits: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            cache: DashMap::new(),
            cache_ttl_secs: config.cache_ttl_secs,
        }
    }

    /// Load every section for the requested symbol. Never fails as a whole:
    /// a dataset that cannot be fetched or normalized leaves its section
    /// unavailable and the rest of the dashboard intact.
    pub async fn load(&self, request: DashboardRequest) -> DashboardSnapshot {
        let symbol = &request.symbol;
        let force = request.force_refresh;
        tracing::info!("Loading dashboard for {}", symbol);

        let (profile, prices, income, balance_sheet, cash_flow, key_metrics, ratios) = tokio::join!(
            self.section(symbol, EndpointKind::Profile, force),
            self.section(symbol, EndpointKind::MonthlyPrices, force),
            self.section(symbol, EndpointKind::IncomeStatement, force),
            self.section(symbol, EndpointKind::BalanceSheet, force),
            self.section(symbol, EndpointKind::CashFlow, force),
            self.section(symbol, EndpointKind::KeyMetrics, force),
            self.section(symbol, EndpointKind::Ratios, force),
        );

        let snapshot = DashboardSnapshot {
            symbol: symbol.clone(),
            profile: pick(EndpointKind::Profile, profile, Normalized::into_profile),
            prices: pick(EndpointKind::MonthlyPrices, prices, Normalized::into_prices),
            income: pick(EndpointKind::IncomeStatement, income, Normalized::into_statement),
            balance_sheet: pick(
                EndpointKind::BalanceSheet,
                balance_sheet,
                Normalized::into_statement,
            ),
            cash_flow: pick(EndpointKind::CashFlow, cash_flow, Normalized::into_statement),
            key_metrics: pick(EndpointKind::KeyMetrics, key_metrics, Normalized::into_statement),
            ratios: pick(EndpointKind::Ratios, ratios, Normalized::into_statement),
            loaded_at: Utc::now(),
        };

        for (kind, e) in snapshot.unavailable() {
            tracing::warn!("{} unavailable for {}: {}", kind, symbol, e);
        }
        tracing::info!(
            "Dashboard for {} loaded ({}/{} sections)",
            symbol,
            EndpointKind::ALL.len() - snapshot.unavailable().len(),
            EndpointKind::ALL.len()
        );

        snapshot
    }

    /// Fetch and normalize one dataset, serving from cache when fresh.
    async fn section(
        &self,
        symbol: &Symbol,
        kind: EndpointKind,
        force: bool,
    ) -> Result<Normalized, DashboardError> {
        if !force {
            if let Some(hit) = self.cached(symbol, kind) {
                tracing::debug!("Cache hit: {} {}", symbol, kind);
                return Ok(hit);
            }
        }

        let raw = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| DashboardError::transport(kind, None, e.to_string()))?;
            self.client.fetch(kind, symbol).await?
        };

        let normalized = self.normalizer.normalize(kind, symbol, &raw)?;

        self.sweep_expired();
        self.cache.insert(
            (symbol.clone(), kind),
            CacheEntry {
                data: normalized.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(normalized)
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - cached_at).num_seconds() < self.cache_ttl_secs
    }

    fn cached(&self, symbol: &Symbol, kind: EndpointKind) -> Option<Normalized> {
        let key = (symbol.clone(), kind);
        let entry = self.cache.get(&key)?;
        if self.is_fresh(entry.cached_at, Utc::now()) {
            return Some(entry.data.clone());
        }
        let stale_at = entry.cached_at;
        drop(entry);
        // Another load may have refreshed the key since the guard was released.
        self.cache.remove_if(&key, |_, e| e.cached_at == stale_at);
        None
    }

    /// Evict expired entries, including symbols never requested again.
    fn sweep_expired(&self) {
        let now = Utc::now();
        self.cache.retain(|_, e| self.is_fresh(e.cached_at, now));
    }

    /// Drop every cached dataset for `symbol`.
    pub fn invalidate(&self, symbol: &Symbol) {
        self.cache.retain(|(cached, _), _| cached != symbol);
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

fn pick<T>(
    kind: EndpointKind,
    section: Result<Normalized, DashboardError>,
    into: fn(Normalized) -> Option<T>,
) -> Section<T> {
    section.and_then(|n| {
        into(n).ok_or_else(|| DashboardError::parse(kind, "unexpected dataset shape"))
    })
}
