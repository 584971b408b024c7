use crate::format::round2;
use dashboard_core::StatementTable;
use serde::{Deserialize, Serialize};

/// Ratios measured in days.
const DAY_COLUMNS: [&str; 5] = [
    "Days of Sales Outstanding",
    "Days of Inventory Outstanding",
    "Operating Cycle",
    "Days of Payables Outstanding",
    "Cash Conversion Cycle",
];

/// Ratios stored as fractions and shown as percentages.
const PERCENT_COLUMNS: [&str; 15] = [
    "Gross Profit Margin",
    "Operating Profit Margin",
    "Pretax Profit Margin",
    "Net Profit Margin",
    "Effective Tax Rate",
    "Return on Assets",
    "Return on Equity",
    "Return on Capital Employed",
    "EBIT per Revenue",
    "Debt Ratio",
    "Long-term Debt to Capitalization",
    "Total Debt to Capitalization",
    "Payout Ratio",
    "Operating Cash Flow Sales Ratio",
    "Dividend Yield",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    pub name: String,
    /// Aligned with `RatioView::periods`.
    pub values: Vec<Option<f64>>,
}

/// Transposed ratio table: one row per ratio, one column per year, oldest
/// year first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioView {
    pub periods: Vec<String>,
    pub rows: Vec<RatioRow>,
}

impl RatioView {
    pub fn row(&self, name: &str) -> Option<&RatioRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Display name for a ratio column, with its unit suffix.
pub fn display_name(column: &str) -> String {
    if DAY_COLUMNS.contains(&column) {
        format!("{} (days)", column)
    } else if PERCENT_COLUMNS.contains(&column) {
        format!("{} (%)", column)
    } else {
        column.to_string()
    }
}

pub fn ratio_display_table(ratios: &StatementTable) -> RatioView {
    let mut order: Vec<usize> = (0..ratios.rows.len()).collect();
    order.sort_by(|a, b| ratios.rows[*a].period.cmp(&ratios.rows[*b].period));

    let periods = order.iter().map(|i| ratios.rows[*i].period.clone()).collect();

    let rows = ratios
        .columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let scale = if PERCENT_COLUMNS.contains(&name.as_str()) { 100.0 } else { 1.0 };
            RatioRow {
                name: display_name(name),
                values: order
                    .iter()
                    .map(|i| {
                        let cell = ratios.rows[*i].values.get(col).copied().flatten();
                        cell.map(|v| round2(v * scale))
                    })
                    .collect(),
            }
        })
        .collect();

    RatioView { periods, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{EndpointKind, StatementRow};

    fn ratios() -> StatementTable {
        let columns = [
            "Current Ratio",
            "Days of Sales Outstanding",
            "Net Profit Margin",
            "Dividend Yield",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        let mut table = StatementTable::new(EndpointKind::Ratios, columns);
        table.push_row("2023", vec![Some(0.99), Some(58.1), Some(0.253062), Some(0.0055)]);
        table.push_row("2022", vec![Some(0.88), Some(56.4), Some(0.2531), None]);
        table
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("Operating Cycle"), "Operating Cycle (days)");
        assert_eq!(display_name("Return on Equity"), "Return on Equity (%)");
        assert_eq!(display_name("Current Ratio"), "Current Ratio");
    }

    #[test]
    fn test_transposed_ascending_years() {
        let view = ratio_display_table(&ratios());

        assert_eq!(view.periods, vec!["2022", "2023"]);
        let names: Vec<_> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Current Ratio",
                "Days of Sales Outstanding (days)",
                "Net Profit Margin (%)",
                "Dividend Yield (%)"
            ]
        );
        assert_eq!(view.row("Current Ratio").unwrap().values, vec![Some(0.88), Some(0.99)]);
    }

    #[test]
    fn test_percent_columns_scaled_and_rounded() {
        let view = ratio_display_table(&ratios());

        let margin = view.row("Net Profit Margin (%)").unwrap();
        assert_eq!(margin.values, vec![Some(25.31), Some(25.31)]);
        assert_eq!(view.row("Dividend Yield (%)").unwrap().values, vec![None, Some(0.55)]);
        let days = view.row("Days of Sales Outstanding (days)").unwrap();
        assert_eq!(days.values, vec![Some(56.4), Some(58.1)]);
    }

    #[test]
    fn test_short_row_reads_as_empty() {
        let mut table = StatementTable::new(
            EndpointKind::Ratios,
            vec!["Current Ratio".to_string(), "Quick Ratio".to_string()],
        );
        table.rows.push(StatementRow {
            period: "2023".to_string(),
            values: vec![Some(0.99)],
        });

        let view = ratio_display_table(&table);
        assert_eq!(view.rows[0].values, vec![Some(0.99)]);
        assert_eq!(view.rows[1].values, vec![None]);
    }

    #[test]
    fn test_empty_ratios() {
        let table = StatementTable::new(EndpointKind::Ratios, vec!["Current Ratio".to_string()]);
        let view = ratio_display_table(&table);
        assert!(view.is_empty());
        assert_eq!(view.rows.len(), 1);
    }
}
