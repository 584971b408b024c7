use crate::{execute, in_band_error};
use async_trait::async_trait;
use dashboard_core::{DashboardError, EndpointKind, MarketDataProvider, Provider, RawRecord, Symbol};
use reqwest::Client;
use std::fmt;

/// Alpha Vantage adapter: company overview and monthly adjusted prices.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for AlphaVantageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AlphaVantageClient {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn function(kind: EndpointKind) -> Option<&'static str> {
        match kind {
            EndpointKind::Profile => Some("OVERVIEW"),
            EndpointKind::MonthlyPrices => Some("TIME_SERIES_MONTHLY_ADJUSTED"),
            _ => None,
        }
    }

    pub(crate) fn request(
        &self,
        kind: EndpointKind,
        symbol: &Symbol,
    ) -> Result<reqwest::Request, DashboardError> {
        let function = Self::function(kind).ok_or_else(|| {
            let provider = Provider::AlphaVantage.name();
            DashboardError::Config(format!("{} does not serve {}", provider, kind))
        })?;

        self.client
            .get(&self.base_url)
            .query(&[
                ("function", function),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .build()
            .map_err(|e| DashboardError::transport(kind, None, e.without_url().to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageClient {
    fn provider(&self) -> Provider {
        Provider::AlphaVantage
    }

    fn supports(&self, kind: EndpointKind) -> bool {
        Self::function(kind).is_some()
    }

    async fn fetch(
        &self,
        kind: EndpointKind,
        symbol: &Symbol,
    ) -> Result<RawRecord, DashboardError> {
        let request = self.request(kind, symbol)?;
        let body = execute(&self.client, Provider::AlphaVantage, kind, request).await?;

        // Alpha Vantage reports errors and rate limits with HTTP 200.
        if let Some(message) = in_band_error(&body, &["Error Message", "Note", "Information"]) {
            return Err(DashboardError::Provider {
                endpoint: kind,
                message,
            });
        }

        if !body.is_object() {
            return Err(DashboardError::parse(kind, "expected a JSON object"));
        }

        Ok(RawRecord {
            provider: Provider::AlphaVantage,
            kind,
            body,
        })
    }
}
