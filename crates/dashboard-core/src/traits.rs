use crate::{DashboardError, EndpointKind, Provider, RawRecord, Symbol};
use async_trait::async_trait;

/// Adapter for one upstream market-data provider.
///
/// A provider swap only needs a new implementation; callers route by
/// `EndpointKind` and never see provider URLs.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn supports(&self, kind: EndpointKind) -> bool;

    async fn fetch(&self, kind: EndpointKind, symbol: &Symbol) -> Result<RawRecord, DashboardError>;
}
