use crate::format::millify;
use dashboard_core::{PriceSeries, StatementTable, Trend};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeLine {
    pub label: String,
    pub value: String,
    /// Rendered in red.
    pub negative: bool,
}

/// Income statement column for one reporting year, millified. `None` when
/// the table has no such year.
pub fn income_statement_for_year(table: &StatementTable, period: &str) -> Option<Vec<IncomeLine>> {
    let row = table.row(period)?;

    let lines = table
        .columns
        .iter()
        .zip(&row.values)
        .map(|(label, value)| {
            let (value, negative) = match value {
                Some(v) => (millify(*v, 2), *v < 0.0),
                None => ("N/A".to_string(), false),
            };
            IncomeLine {
                label: label.clone(),
                value,
                negative,
            }
        })
        .collect();

    Some(lines)
}

/// Direction of the price line over the window: latest close against the
/// oldest one kept.
pub fn price_trend(series: &PriceSeries) -> Trend {
    match (series.latest(), series.oldest()) {
        (Some(latest), Some(oldest)) => Trend::from_change(latest.price - oldest.price),
        _ => Trend::Flat,
    }
}
