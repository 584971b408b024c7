use crate::coerce_number;
use crate::schema::{profile_schema, ValueKind};
use dashboard_core::{CompanyProfile, DashboardError, EndpointKind, ProfileValue, Provider, Symbol};
use serde_json::Value;

const KIND: EndpointKind = EndpointKind::Profile;

/// Company profile in canonical field order.
///
/// FMP answers with a one-element list, Alpha Vantage with a flat object.
/// Only the identifying name is required; other absent fields are `Missing`.
pub fn normalize_profile(
    provider: Provider,
    symbol: &Symbol,
    body: &Value,
) -> Result<CompanyProfile, DashboardError> {
    let schema = profile_schema(provider);

    let record = match provider {
        Provider::Fmp => body
            .as_array()
            .ok_or_else(|| DashboardError::parse(KIND, "expected a JSON list"))?
            .first()
            .ok_or_else(|| DashboardError::schema(KIND, "symbol"))?,
        Provider::AlphaVantage => body,
    };
    let record = record
        .as_object()
        .ok_or_else(|| DashboardError::parse(KIND, "profile entry is not an object"))?;

    if record.get(schema.identity).map_or(true, Value::is_null) {
        return Err(DashboardError::schema(KIND, schema.identity));
    }

    let mut profile = CompanyProfile::new(symbol.clone());
    for spec in schema.fields {
        let value = match (spec.value, record.get(spec.source)) {
            (_, None) | (_, Some(Value::Null)) => ProfileValue::Missing,
            (ValueKind::Number, Some(raw)) => coerce_number(raw)
                .map(ProfileValue::Number)
                .unwrap_or(ProfileValue::Missing),
            (ValueKind::Text, Some(Value::String(s))) if s.trim().is_empty() || s == "None" => {
                ProfileValue::Missing
            }
            (ValueKind::Text, Some(Value::String(s))) => ProfileValue::Text(s.clone()),
            (ValueKind::Text, Some(other)) => ProfileValue::Text(other.to_string()),
        };
        profile.push(spec.canonical, value);
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").unwrap()
    }

    #[test]
    fn test_fmp_profile() {
        let body = json!([{
            "symbol": "AAPL",
            "companyName": "Apple Inc.",
            "exchangeShortName": "NASDAQ",
            "currency": "USD",
            "sector": "Technology",
            "mktCap": 2_900_000_000_000_i64,
            "price": 189.5,
            "changes": -1.25,
            "beta": 1.29,
            "website": "https://www.apple.com",
            "image": "https://financialmodelingprep.com/image-stock/AAPL.png"
        }]);
        let profile = normalize_profile(Provider::Fmp, &symbol(), &body).unwrap();

        let names: Vec<_> = profile.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "Name",
                "Exchange",
                "Currency",
                "Sector",
                "Market Cap",
                "Price",
                "Price change",
                "Beta",
                "Website",
                "Image"
            ]
        );
        assert_eq!(profile.text("Name"), Some("Apple Inc."));
        assert_eq!(profile.number("Market Cap"), Some(2.9e12));
        assert_eq!(profile.number("Price change"), Some(-1.25));
    }

    #[test]
    fn test_fmp_empty_list_is_schema_error() {
        let err = normalize_profile(Provider::Fmp, &symbol(), &json!([])).unwrap_err();
        assert_eq!(err, DashboardError::schema(KIND, "symbol"));
    }

    #[test]
    fn test_alpha_vantage_overview_coerces_strings() {
        let body = json!({
            "Symbol": "IBM",
            "Name": "International Business Machines",
            "Exchange": "NYSE",
            "Currency": "USD",
            "Sector": "TECHNOLOGY",
            "MarketCapitalization": "170000000000",
            "PERatio": "22.5",
            "DividendYield": "None",
            "ProfitMargin": "0.09",
            "EPS": "7.5"
        });
        let profile = normalize_profile(Provider::AlphaVantage, &symbol(), &body).unwrap();

        assert_eq!(profile.number("Market Cap"), Some(1.7e11));
        assert_eq!(profile.number("P/E ratio"), Some(22.5));
        assert!(profile.get("Dividends (Yield)").unwrap().is_missing());
        // Absent upstream, still listed.
        assert!(profile.get("Beta").unwrap().is_missing());
        assert_eq!(profile.fields.len(), 10);
    }

    #[test]
    fn test_alpha_vantage_unknown_symbol() {
        let err = normalize_profile(Provider::AlphaVantage, &symbol(), &json!({})).unwrap_err();
        assert_eq!(err, DashboardError::schema(KIND, "Name"));
    }
}
