use crate::coerce_number;
use crate::schema::{PeriodKey, StatementSchema};
use dashboard_core::{DashboardError, EndpointKind, StatementTable};
use serde_json::{Map, Value};

/// Build a year-keyed table from an FMP statement list.
///
/// Every mapped field must be present in every record; `null` is accepted and
/// stored as an empty cell. Rows come back most recent first.
pub fn normalize_statement(
    schema: &StatementSchema,
    body: &Value,
) -> Result<StatementTable, DashboardError> {
    let kind = schema.kind;
    let records = body
        .as_array()
        .ok_or_else(|| DashboardError::parse(kind, "expected a JSON list of periods"))?;

    let mut table = StatementTable::new(kind, schema.columns());

    for record in records {
        let record = record
            .as_object()
            .ok_or_else(|| DashboardError::parse(kind, "period entry is not an object"))?;

        let period = period_of(kind, schema.period, record)?;

        let mut values = Vec::with_capacity(schema.fields.len());
        for field in schema.fields {
            let raw = record
                .get(field.source)
                .ok_or_else(|| DashboardError::schema(kind, field.source))?;
            values.push(coerce_number(raw).map(|v| field.rounding.apply(v)));
        }

        table.push_row(period, values);
    }

    table.sort_most_recent_first();
    Ok(table)
}

fn period_of(
    kind: EndpointKind,
    key: PeriodKey,
    record: &Map<String, Value>,
) -> Result<String, DashboardError> {
    let field = key.source_field();
    let raw = record
        .get(field)
        .ok_or_else(|| DashboardError::schema(kind, field))?;

    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(DashboardError::parse(kind, format!("'{}' is not a string", field))),
    };

    let period = match key {
        PeriodKey::CalendarYear => text,
        PeriodKey::DateYear => text.split('-').next().unwrap_or_default().to_string(),
    };

    if period.is_empty() {
        return Err(DashboardError::parse(kind, format!("empty '{}'", field)));
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CASH_FLOW, INCOME_STATEMENT, KEY_METRICS, RATIOS};
    use serde_json::json;

    fn income_record(year: &str, revenue: Value) -> Value {
        json!({
            "date": format!("{}-09-30", year),
            "calendarYear": year,
            "revenue": revenue,
            "costOfRevenue": 50.0,
            "grossProfit": 50.0,
            "operatingExpenses": 20.0,
            "operatingIncome": 30.0,
            "totalOtherIncomeExpensesNet": -1.0,
            "incomeBeforeTax": 29.0,
            "incomeTaxExpense": 4.0,
            "netIncome": 25.0
        })
    }

    #[test]
    fn test_empty_list_yields_empty_table() {
        let table = normalize_statement(&INCOME_STATEMENT, &json!([])).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 9);
        assert_eq!(table.columns[0], "Revenue");
    }

    #[test]
    fn test_rows_sorted_most_recent_first() {
        let body = json!([
            income_record("2021", json!(90.0)),
            income_record("2023", json!(110.0)),
            income_record("2022", json!(100.0)),
        ]);
        let table = normalize_statement(&INCOME_STATEMENT, &body).unwrap();

        assert_eq!(table.periods().collect::<Vec<_>>(), vec!["2023", "2022", "2021"]);
        assert_eq!(table.value(0, "Revenue"), Some(110.0));
        assert_eq!(table.value(0, "= Net Income"), Some(25.0));
    }

    #[test]
    fn test_null_is_empty_cell() {
        let body = json!([income_record("2023", Value::Null)]);
        let table = normalize_statement(&INCOME_STATEMENT, &body).unwrap();
        assert_eq!(table.value(0, "Revenue"), None);
        assert_eq!(table.value(0, "= Gross Profit"), Some(50.0));
    }

    #[test]
    fn test_absent_field_is_schema_error() {
        let mut record = income_record("2023", json!(1.0));
        record.as_object_mut().unwrap().remove("netIncome");

        let err = normalize_statement(&INCOME_STATEMENT, &json!([record])).unwrap_err();
        assert_eq!(err, DashboardError::schema(EndpointKind::IncomeStatement, "netIncome"));
    }

    #[test]
    fn test_date_year_period() {
        let body = json!([{
            "date": "2022-03-15",
            "marketCap": 2.5e12,
            "workingCapital": 1.0e10,
            "debtToEquity": 1.234,
            "peRatio": 28.1,
            "roe": 0.156,
            "dividendYield": 0.0055
        }]);
        let table = normalize_statement(&KEY_METRICS, &body).unwrap();

        assert_eq!(table.periods().collect::<Vec<_>>(), vec!["2022"]);
        // Key metrics are not rounded at this stage.
        assert_eq!(table.value(0, "D/E ratio"), Some(1.234));
    }

    #[test]
    fn test_missing_date_is_schema_error() {
        let body = json!([{ "freeCashFlow": 1.0 }]);
        let err = normalize_statement(&CASH_FLOW, &body).unwrap_err();
        assert_eq!(err, DashboardError::schema(EndpointKind::CashFlow, "date"));
    }

    #[test]
    fn test_numeric_calendar_year() {
        let mut record = income_record("2020", json!(1.0));
        record["calendarYear"] = json!(2020);
        let table = normalize_statement(&INCOME_STATEMENT, &json!([record])).unwrap();
        assert_eq!(table.latest().unwrap().period, "2020");
    }

    #[test]
    fn test_ratio_rounding() {
        let mut record = serde_json::Map::new();
        record.insert("date".to_string(), json!("2023-09-30"));
        for field in RATIOS.fields {
            record.insert(field.source.to_string(), json!(0.123456));
        }
        let table = normalize_statement(&RATIOS, &json!([Value::Object(record)])).unwrap();

        assert_eq!(table.value(0, "Current Ratio"), Some(0.12));
        assert_eq!(table.value(0, "Gross Profit Margin"), Some(0.123456));
        assert_eq!(table.value(0, "Dividend Yield"), Some(0.123456));
    }

    #[test]
    fn test_non_list_body_is_parse_error() {
        let err = normalize_statement(&CASH_FLOW, &json!({"date": "2023"})).unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
    }
}
