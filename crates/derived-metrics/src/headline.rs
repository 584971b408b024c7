use crate::delta::delta;
use crate::format::{millify, percent, round2};
use dashboard_core::{Delta, StatementTable};
use serde::{Deserialize, Serialize};

/// One headline card: label, formatted latest value, change since last year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: Option<Delta>,
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Millified,
    Rounded,
    Percent,
}

// (card label, key metrics column, how the latest value is shown)
const CARDS: [(&str, &str, Style); 6] = [
    ("Market Cap", "Market Cap", Style::Millified),
    ("D/E Ratio", "D/E ratio", Style::Rounded),
    ("ROE", "ROE", Style::Percent),
    ("Working Capital", "Working Capital", Style::Millified),
    ("P/E Ratio", "P/E Ratio", Style::Rounded),
    ("Dividends (yield)", "Dividend Yield", Style::Percent),
];

const NOT_AVAILABLE: &str = "N/A";

/// The six key-metric cards shown above the charts.
///
/// A card whose latest value is missing shows `N/A`. A delta that cannot be
/// computed is left out rather than failing the whole row. A company paying
/// no dividend shows a plain `0` with no delta.
pub fn headline_metrics(key_metrics: &StatementTable) -> Vec<MetricCard> {
    CARDS
        .iter()
        .map(|(label, field, style)| {
            let latest = key_metrics.value(0, field);

            if *field == "Dividend Yield" && latest == Some(0.0) {
                return MetricCard {
                    label: label.to_string(),
                    value: "0".to_string(),
                    delta: None,
                };
            }

            let value = match (latest, style) {
                (None, _) => NOT_AVAILABLE.to_string(),
                (Some(v), Style::Millified) => millify(v, 2),
                (Some(v), Style::Rounded) => round2(v).to_string(),
                (Some(v), Style::Percent) => percent(v, 2),
            };

            let delta = match delta(key_metrics, field) {
                Ok(d) => Some(d),
                Err(e) => {
                    tracing::debug!("No delta for {}: {}", label, e);
                    None
                }
            };

            MetricCard {
                label: label.to_string(),
                value,
                delta,
            }
        })
        .collect()
}
