use crate::{execute, in_band_error};
use async_trait::async_trait;
use dashboard_core::{DashboardError, EndpointKind, MarketDataProvider, Provider, RawRecord, Symbol};
use reqwest::Client;
use std::fmt;

/// Financial Modeling Prep adapter: company profile and the five year-keyed
/// statement endpoints.
#[derive(Clone)]
pub struct FmpClient {
    client: Client,
    base_url: String,
    api_key: String,
    limit: u32,
}

impl fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("limit", &self.limit)
            .finish()
    }
}

impl FmpClient {
    pub fn new(client: Client, base_url: String, api_key: String, limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            limit,
        }
    }

    fn path(kind: EndpointKind) -> Option<&'static str> {
        match kind {
            EndpointKind::Profile => Some("profile"),
            EndpointKind::IncomeStatement => Some("income-statement"),
            EndpointKind::BalanceSheet => Some("balance-sheet-statement"),
            EndpointKind::CashFlow => Some("cash-flow-statement"),
            EndpointKind::KeyMetrics => Some("key-metrics"),
            EndpointKind::Ratios => Some("ratios"),
            EndpointKind::MonthlyPrices => None,
        }
    }

    /// Build the GET request for `kind`. Statements carry the period limit.
    pub(crate) fn request(
        &self,
        kind: EndpointKind,
        symbol: &Symbol,
    ) -> Result<reqwest::Request, DashboardError> {
        let path = Self::path(kind).ok_or_else(|| {
            DashboardError::Config(format!("{} does not serve {}", Provider::Fmp.name(), kind))
        })?;
        let url = format!("{}/{}/{}", self.base_url, path, symbol);

        let mut query: Vec<(&str, String)> = Vec::new();
        if kind.is_year_keyed() {
            query.push(("limit", self.limit.to_string()));
        }
        query.push(("apikey", self.api_key.clone()));

        self.client
            .get(&url)
            .query(&query)
            .build()
            .map_err(|e| DashboardError::transport(kind, None, e.without_url().to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for FmpClient {
    fn provider(&self) -> Provider {
        Provider::Fmp
    }

    fn supports(&self, kind: EndpointKind) -> bool {
        Self::path(kind).is_some()
    }

    async fn fetch(
        &self,
        kind: EndpointKind,
        symbol: &Symbol,
    ) -> Result<RawRecord, DashboardError> {
        let request = self.request(kind, symbol)?;
        let body = execute(&self.client, Provider::Fmp, kind, request).await?;

        if let Some(message) = in_band_error(&body, &["Error Message", "error"]) {
            return Err(DashboardError::Provider {
                endpoint: kind,
                message,
            });
        }

        // Every FMP endpoint used here answers with a JSON list.
        if !body.is_array() {
            return Err(DashboardError::parse(kind, "expected a JSON list"));
        }

        Ok(RawRecord {
            provider: Provider::Fmp,
            kind,
            body,
        })
    }
}
