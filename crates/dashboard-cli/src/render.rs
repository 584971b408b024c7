use dashboard_core::{DashboardError, EndpointKind, StatementTable, Trend};
use dashboard_orchestrator::DashboardSnapshot;
use derived_metrics::{
    headline_metrics, income_statement_for_year, millify, price_trend, ratio_display_table,
};
use std::fmt::Write;

fn arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
        Trend::Flat => "=",
    }
}

fn unavailable(out: &mut String, err: &DashboardError) {
    let _ = writeln!(out, "  {}", err.user_message());
}

/// Text dashboard for a snapshot, sections in dashboard order.
pub fn render(snapshot: &DashboardSnapshot, year: Option<&str>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===", snapshot.symbol);

    // Company profile
    match &snapshot.profile {
        Ok(profile) => {
            for (name, value) in profile.iter() {
                let _ = writeln!(out, "  {:<18} {}", name, value);
            }
        }
        Err(e) => unavailable(&mut out, e),
    }

    out.push_str("\n-- Key Metrics --\n");
    match &snapshot.key_metrics {
        Ok(metrics) => {
            for card in headline_metrics(metrics) {
                let delta = card
                    .delta
                    .map(|d| format!("  {} {}", arrow(d.trend()), d))
                    .unwrap_or_default();
                let _ = writeln!(out, "  {:<18} {:>10}{}", card.label, card.value, delta);
            }
        }
        Err(e) => unavailable(&mut out, e),
    }

    out.push_str("\n-- Market Performance --\n");
    match &snapshot.prices {
        Ok(prices) => match (prices.latest(), prices.oldest()) {
            (Some(latest), Some(oldest)) => {
                let _ = writeln!(
                    out,
                    "  {} {} months: {:.2} ({}) -> {:.2} ({})",
                    arrow(price_trend(prices)),
                    prices.len(),
                    oldest.price,
                    oldest.date,
                    latest.price,
                    latest.date
                );
            }
            _ => out.push_str("  No price history\n"),
        },
        Err(e) => unavailable(&mut out, e),
    }

    out.push_str("\n-- Income Statement --\n");
    match &snapshot.income {
        Ok(income) => {
            let selected = year.or_else(|| income.latest().map(|r| r.period.as_str()));
            let statement =
                selected.and_then(|y| income_statement_for_year(income, y).map(|l| (y, l)));
            match statement {
                Some((y, lines)) => {
                    let _ = writeln!(out, "  Year {}", y);
                    for line in lines {
                        let _ = writeln!(out, "  {:<30} {:>10}", line.label, line.value);
                    }
                }
                None => {
                    let available: Vec<_> = income.periods().collect();
                    let _ = writeln!(
                        out,
                        "  No income statement for that year (available: {})",
                        available.join(", ")
                    );
                }
            }
        }
        Err(e) => unavailable(&mut out, e),
    }

    for kind in [EndpointKind::BalanceSheet, EndpointKind::CashFlow] {
        let _ = writeln!(out, "\n-- {} --", kind);
        match snapshot.statement(kind) {
            Some(Ok(table)) => latest_row(&mut out, table),
            Some(Err(e)) => unavailable(&mut out, e),
            None => {}
        }
    }

    out.push_str("\n-- Financial Ratios --\n");
    match &snapshot.ratios {
        Ok(ratios) => {
            let view = ratio_display_table(ratios);
            let _ = write!(out, "  {:<45}", "Ratio");
            for period in &view.periods {
                let _ = write!(out, " {:>9}", period);
            }
            out.push('\n');
            for row in &view.rows {
                let _ = write!(out, "  {:<45}", row.name);
                for value in &row.values {
                    let cell = value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
                    let _ = write!(out, " {:>9}", cell);
                }
                out.push('\n');
            }
        }
        Err(e) => unavailable(&mut out, e),
    }

    out
}

fn latest_row(out: &mut String, table: &StatementTable) {
    let Some(row) = table.latest() else {
        out.push_str("  No reported periods\n");
        return;
    };
    let _ = writeln!(out, "  Year {}", row.period);
    for (column, value) in table.columns.iter().zip(&row.values) {
        let value = value.map(|v| millify(v, 2)).unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(out, "  {:<40} {:>10}", column, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dashboard_core::{CompanyProfile, PriceSeries, ProfileValue, Symbol};

    fn table(
        kind: EndpointKind,
        columns: &[&str],
        rows: &[(&str, Vec<Option<f64>>)],
    ) -> StatementTable {
        let mut table = StatementTable::new(kind, columns.iter().map(|c| c.to_string()).collect());
        for (period, values) in rows {
            table.push_row(*period, values.clone());
        }
        table
    }

    fn snapshot() -> DashboardSnapshot {
        let symbol = Symbol::parse("AAPL").unwrap();
        let mut profile = CompanyProfile::new(symbol.clone());
        profile.push("Name", ProfileValue::Text("Apple Inc.".to_string()));

        DashboardSnapshot {
            symbol,
            profile: Ok(profile),
            prices: Ok(PriceSeries::default()),
            income: Ok(table(
                EndpointKind::IncomeStatement,
                &["Revenue", "= Net Income"],
                &[
                    ("2023", vec![Some(383_289_000_000.0), Some(96_995_000_000.0)]),
                    ("2022", vec![Some(394_328_000_000.0), Some(99_803_000_000.0)]),
                ],
            )),
            balance_sheet: Ok(table(
                EndpointKind::BalanceSheet,
                &["Assets"],
                &[("2023", vec![Some(352_583_000_000.0)])],
            )),
            cash_flow: Err(DashboardError::transport(
                EndpointKind::CashFlow,
                Some(429),
                "Too Many Requests",
            )),
            key_metrics: Ok(table(
                EndpointKind::KeyMetrics,
                &["Market Cap", "ROE"],
                &[
                    ("2023", vec![Some(2.9e12), Some(1.56)]),
                    ("2022", vec![Some(2.0e12), Some(1.75)]),
                ],
            )),
            ratios: Ok(table(
                EndpointKind::Ratios,
                &["Current Ratio"],
                &[("2023", vec![Some(0.99)])],
            )),
            loaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_sections() {
        let text = render(&snapshot(), None);

        assert!(text.starts_with("=== AAPL ==="));
        assert!(text.contains("Apple Inc."));
        assert!(text.contains("Year 2023"));
        assert!(text.contains("383.29B"));
        assert!(text.contains("▲ 45.00%"));
        assert!(text.contains("No price history"));
        assert!(text.contains("Not possible to retrieve cash flow"));
        assert!(text.contains("352.58B"));
    }

    #[test]
    fn test_render_selected_year() {
        let text = render(&snapshot(), Some("2022"));
        assert!(text.contains("Year 2022"));
        assert!(text.contains("394.33B"));

        let text = render(&snapshot(), Some("1999"));
        assert!(text.contains("available: 2023, 2022"));
    }
}
