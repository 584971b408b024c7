//! Statement normalizer
//!
//! Turns raw provider JSON into the canonical dashboard shapes: a named-field
//! company profile, a bounded monthly price series, or a year-keyed statement
//! table. Field mappings live in [`schema`]; this crate never performs I/O.

pub mod prices;
pub mod profile;
pub mod schema;
pub mod statement;

pub use prices::normalize_prices;
pub use profile::normalize_profile;
pub use schema::{FieldSpec, PeriodKey, Rounding, StatementSchema};
pub use statement::normalize_statement;

use dashboard_core::{DashboardError, EndpointKind, Normalized, RawRecord, Symbol};
use serde_json::Value;

/// Default monthly look-back: five years.
pub const DEFAULT_PRICE_WINDOW: usize = 60;

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    price_window: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_WINDOW)
    }
}

impl Normalizer {
    pub fn new(price_window: usize) -> Self {
        Self { price_window }
    }

    pub fn price_window(&self) -> usize {
        self.price_window
    }

    /// Normalize one fetched dataset into its canonical shape.
    pub fn normalize(
        &self,
        kind: EndpointKind,
        symbol: &Symbol,
        raw: &RawRecord,
    ) -> Result<Normalized, DashboardError> {
        if raw.kind != kind {
            return Err(DashboardError::parse(
                kind,
                format!("received a {} record", raw.kind.label().to_lowercase()),
            ));
        }

        let normalized = match kind {
            EndpointKind::Profile => {
                Normalized::Profile(normalize_profile(raw.provider, symbol, &raw.body)?)
            }
            EndpointKind::MonthlyPrices => {
                Normalized::Prices(normalize_prices(&raw.body, self.price_window)?)
            }
            _ => {
                let schema = schema::statement_schema(raw.provider, kind).ok_or_else(|| {
                    DashboardError::Config(format!(
                        "no field mapping for {} from {}",
                        kind,
                        raw.provider.name()
                    ))
                })?;
                Normalized::Statement(normalize_statement(schema, &raw.body)?)
            }
        };

        tracing::debug!("Normalized {} for {}", kind, symbol);
        Ok(normalized)
    }
}

/// Numeric cell coercion. Alpha Vantage sends numbers as strings and writes
/// `"None"` or `"-"` for absent values; those and JSON `null` become `None`.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            match s {
                "" | "None" | "-" | "null" => None,
                _ => s.parse::<f64>().ok().filter(|v| v.is_finite()),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::Provider;
    use serde_json::json;

    fn record(provider: Provider, kind: EndpointKind, body: Value) -> RawRecord {
        RawRecord { provider, kind, body }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(1.5)), Some(1.5));
        assert_eq!(coerce_number(&json!("2.25")), Some(2.25));
        assert_eq!(coerce_number(&json!("None")), None);
        assert_eq!(coerce_number(&json!("-")), None);
        assert_eq!(coerce_number(&Value::Null), None);
        assert_eq!(coerce_number(&json!(true)), None);
    }

    #[test]
    fn test_dispatch_by_kind() {
        let symbol = Symbol::parse("AAPL").unwrap();
        let normalizer = Normalizer::default();

        let raw = record(
            Provider::Fmp,
            EndpointKind::BalanceSheet,
            json!([{
                "calendarYear": "2023",
                "totalAssets": 352.0,
                "totalCurrentAssets": 143.0,
                "totalNonCurrentAssets": 209.0,
                "totalCurrentLiabilities": 145.0,
                "totalNonCurrentLiabilities": 145.0,
                "totalLiabilities": 290.0,
                "totalEquity": 62.0
            }]),
        );
        let table = normalizer
            .normalize(EndpointKind::BalanceSheet, &symbol, &raw)
            .unwrap()
            .into_statement()
            .unwrap();
        assert_eq!(table.kind, EndpointKind::BalanceSheet);
        assert_eq!(table.value(0, "Equity"), Some(62.0));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let symbol = Symbol::parse("AAPL").unwrap();
        let raw = record(Provider::Fmp, EndpointKind::CashFlow, json!([]));
        let err = Normalizer::default()
            .normalize(EndpointKind::Ratios, &symbol, &raw)
            .unwrap_err();
        assert!(matches!(err, DashboardError::Parse { endpoint: EndpointKind::Ratios, .. }));
    }

    #[test]
    fn test_unmapped_provider_statement() {
        let symbol = Symbol::parse("AAPL").unwrap();
        let raw = record(Provider::AlphaVantage, EndpointKind::Ratios, json!([]));
        let err = Normalizer::default()
            .normalize(EndpointKind::Ratios, &symbol, &raw)
            .unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
