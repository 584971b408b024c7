use crate::coerce_number;
use crate::schema::{MONTHLY_CLOSE_KEY, MONTHLY_SERIES_KEY};
use chrono::NaiveDate;
use dashboard_core::{DashboardError, EndpointKind, PricePoint, PriceSeries};
use serde_json::Value;

const KIND: EndpointKind = EndpointKind::MonthlyPrices;

/// Monthly closes from an Alpha Vantage `TIME_SERIES_MONTHLY_ADJUSTED` body,
/// most recent first, at most `window` points.
pub fn normalize_prices(body: &Value, window: usize) -> Result<PriceSeries, DashboardError> {
    let series = body
        .get(MONTHLY_SERIES_KEY)
        .ok_or_else(|| DashboardError::schema(KIND, MONTHLY_SERIES_KEY))?
        .as_object()
        .ok_or_else(|| {
            DashboardError::parse(KIND, format!("'{}' is not an object", MONTHLY_SERIES_KEY))
        })?;

    let mut points = Vec::with_capacity(series.len());
    for (date, bar) in series {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| DashboardError::parse(KIND, format!("bad date '{}': {}", date, e)))?;

        let close = bar
            .get(MONTHLY_CLOSE_KEY)
            .ok_or_else(|| DashboardError::schema(KIND, MONTHLY_CLOSE_KEY))?;
        let price = coerce_number(close).ok_or_else(|| {
            DashboardError::parse(KIND, format!("non-numeric close on {}: {}", date, close))
        })?;

        points.push(PricePoint { date, price });
    }

    points.sort_by(|a, b| b.date.cmp(&a.date));
    points.truncate(window);

    Ok(PriceSeries::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Months};
    use serde_json::{json, Map};

    fn monthly_body(months: u32) -> Value {
        let start = NaiveDate::from_ymd_opt(2014, 1, 31).unwrap();
        let mut series = Map::new();
        for i in 0..months {
            let date = start + Months::new(i);
            series.insert(
                date.format("%Y-%m-%d").to_string(),
                json!({
                    "1. open": "1.0",
                    "4. close": format!("{}.50", 100 + i),
                    "5. adjusted close": "1.0"
                }),
            );
        }
        json!({
            "Meta Data": { "2. Symbol": "IBM" },
            "Monthly Adjusted Time Series": series
        })
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let series = normalize_prices(&monthly_body(120), 60).unwrap();

        assert_eq!(series.len(), 60);
        let dates: Vec<_> = series.iter().map(|p| p.date).collect();
        assert!(dates.windows(2).all(|w| w[0] > w[1]));

        let latest = series.latest().unwrap();
        assert_eq!(latest.date.year(), 2023);
        assert_eq!(latest.price, 219.5);
    }

    #[test]
    fn test_short_history_kept_whole() {
        let series = normalize_prices(&monthly_body(12), 60).unwrap();
        assert_eq!(series.len(), 12);
        assert_eq!(series.oldest().unwrap().price, 100.5);
    }

    #[test]
    fn test_missing_series_is_schema_error() {
        let err = normalize_prices(&json!({"Meta Data": {}}), 60).unwrap_err();
        assert_eq!(err, DashboardError::schema(KIND, MONTHLY_SERIES_KEY));
    }

    #[test]
    fn test_missing_close_is_schema_error() {
        let body = json!({
            "Monthly Adjusted Time Series": { "2024-01-31": { "1. open": "1.0" } }
        });
        let err = normalize_prices(&body, 60).unwrap_err();
        assert_eq!(err, DashboardError::schema(KIND, MONTHLY_CLOSE_KEY));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let body = json!({
            "Monthly Adjusted Time Series": { "January": { "4. close": "1.0" } }
        });
        assert!(matches!(
            normalize_prices(&body, 60),
            Err(DashboardError::Parse { .. })
        ));
    }
}
