//! Market data client
//!
//! Routes each `EndpointKind` to the provider adapter that serves it and
//! returns the decoded JSON body untouched. No retries, caching or rate
//! limiting happen here; a failed request is final for that dataset.

pub mod alpha_vantage;
pub mod fmp;

pub use alpha_vantage::AlphaVantageClient;
pub use fmp::FmpClient;

use dashboard_core::{
    DashboardConfig, DashboardError, EndpointKind, MarketDataProvider, ProfileSource, Provider,
    RawRecord, Symbol,
};
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Routing table from dataset to provider adapter.
#[derive(Clone, Default)]
pub struct MarketDataClient {
    routes: HashMap<EndpointKind, Arc<dyn MarketDataProvider>>,
}

impl MarketDataClient {
    /// Statements from FMP, monthly prices from Alpha Vantage, profile from
    /// whichever provider the config selects.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let client = build_http_client(config.http_timeout_secs);

        let fmp: Arc<dyn MarketDataProvider> = Arc::new(FmpClient::new(
            client.clone(),
            config.fmp_base_url.clone(),
            config.fmp_api_key.clone(),
            config.statement_limit,
        ));
        let alpha_vantage: Arc<dyn MarketDataProvider> = Arc::new(AlphaVantageClient::new(
            client,
            config.alpha_vantage_base_url.clone(),
            config.alpha_vantage_api_key.clone(),
        ));

        let mut routes = HashMap::new();
        for kind in EndpointKind::ALL {
            let adapter = match kind {
                EndpointKind::MonthlyPrices => alpha_vantage.clone(),
                EndpointKind::Profile => match config.profile_source {
                    ProfileSource::Fmp => fmp.clone(),
                    ProfileSource::AlphaVantage => alpha_vantage.clone(),
                },
                _ => fmp.clone(),
            };
            routes.insert(kind, adapter);
        }

        Self { routes }
    }

    /// Register (or replace) the adapter serving `kind`.
    pub fn route(
        mut self,
        kind: EndpointKind,
        adapter: Arc<dyn MarketDataProvider>,
    ) -> Result<Self, DashboardError> {
        if !adapter.supports(kind) {
            return Err(DashboardError::Config(format!(
                "{} does not serve {}",
                adapter.provider().name(),
                kind
            )));
        }
        self.routes.insert(kind, adapter);
        Ok(self)
    }

    pub fn provider_for(&self, kind: EndpointKind) -> Option<Provider> {
        self.routes.get(&kind).map(|a| a.provider())
    }

    /// Fetch one dataset for `symbol`.
    pub async fn fetch(
        &self,
        kind: EndpointKind,
        symbol: &Symbol,
    ) -> Result<RawRecord, DashboardError> {
        let adapter = self
            .routes
            .get(&kind)
            .ok_or_else(|| DashboardError::Config(format!("no provider configured for {}", kind)))?;
        adapter.fetch(kind, symbol).await
    }
}

impl fmt::Debug for MarketDataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<(EndpointKind, &'static str)> = self
            .routes
            .iter()
            .map(|(k, a)| (*k, a.provider().name()))
            .collect();
        routes.sort_by_key(|(k, _)| *k);
        f.debug_struct("MarketDataClient").field("routes", &routes).finish()
    }
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send a prepared request and decode the body. The API key lives in the
/// query string, so neither logs nor errors carry the full URL.
pub(crate) async fn execute(
    client: &Client,
    provider: Provider,
    kind: EndpointKind,
    request: reqwest::Request,
) -> Result<serde_json::Value, DashboardError> {
    tracing::debug!("{} request: {} ({})", provider.name(), request.url().path(), kind);

    let response = client.execute(request).await.map_err(|e| {
        let status = e.status().map(|s| s.as_u16());
        DashboardError::transport(kind, status, e.without_url().to_string())
    })?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| DashboardError::transport(kind, Some(status), e.without_url().to_string()))?;

    decode_body(kind, status, &body)
}

/// Status check plus JSON decoding, separated from I/O.
pub(crate) fn decode_body(
    kind: EndpointKind,
    status: u16,
    body: &str,
) -> Result<serde_json::Value, DashboardError> {
    if !(200..300).contains(&status) {
        return Err(DashboardError::transport(
            kind,
            Some(status),
            format!("HTTP {}: {}", status, truncate(body, 200)),
        ));
    }

    serde_json::from_str(body).map_err(|e| DashboardError::parse(kind, e.to_string()))
}

/// First in-band error message found under any of `keys`.
pub(crate) fn in_band_error(body: &serde_json::Value, keys: &[&str]) -> Option<String> {
    let obj = body.as_object()?;
    keys.iter().find_map(|key| {
        obj.get(*key).map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
