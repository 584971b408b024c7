use dashboard_core::{CompanyProfile, EndpointKind, PriceSeries, ProfileValue, StatementTable};
use derived_metrics::{ratio_display_table, round2};

/// A named grid of string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Drop the arithmetic markers income-statement labels carry, along with one
/// following space: `"(-) Cost of Revenue"` -> `"Cost of Revenue"`.
pub fn clean_header(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if matches!(c, '/' | '(' | ')' | '-' | '+' | '=') {
            if chars.peek().map_or(false, |n| n.is_whitespace()) {
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}

pub(crate) fn profile_sheet(profile: &CompanyProfile) -> Sheet {
    let rows = profile
        .iter()
        .map(|(name, value)| {
            let value = match value {
                ProfileValue::Missing => String::new(),
                other => other.to_string(),
            };
            vec![name.to_string(), value]
        })
        .collect();

    Sheet {
        name: EndpointKind::Profile.sheet_name().to_string(),
        header: vec!["Key".to_string(), "Value".to_string()],
        rows,
    }
}

pub(crate) fn price_sheet(prices: &PriceSeries) -> Sheet {
    let rows = prices
        .iter()
        .map(|p| vec![p.date.format("%Y-%m-%d").to_string(), p.price.to_string()])
        .collect();

    Sheet {
        name: EndpointKind::MonthlyPrices.sheet_name().to_string(),
        header: vec!["Date".to_string(), "Price".to_string()],
        rows,
    }
}

/// Year-keyed statements get a leading `Year` column. The ratio sheet uses
/// the transposed display view instead.
pub(crate) fn statement_sheet(table: &StatementTable) -> Sheet {
    if table.kind == EndpointKind::Ratios {
        return ratio_sheet(table);
    }

    let round = table.kind != EndpointKind::CashFlow;
    let mut header = vec!["Year".to_string()];
    header.extend(table.columns.iter().map(|c| match table.kind {
        EndpointKind::IncomeStatement => clean_header(c),
        _ => c.clone(),
    }));

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.period.clone()];
            cells.extend(row.values.iter().map(|v| match v {
                Some(v) if round => round2(*v).to_string(),
                Some(v) => v.to_string(),
                None => String::new(),
            }));
            cells
        })
        .collect();

    Sheet {
        name: table.kind.sheet_name().to_string(),
        header,
        rows,
    }
}

fn ratio_sheet(table: &StatementTable) -> Sheet {
    let view = ratio_display_table(table);

    let mut header = vec!["Ratio".to_string()];
    header.extend(view.periods.iter().cloned());

    let rows = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.name.clone()];
            cells.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
            cells
        })
        .collect();

    Sheet {
        name: EndpointKind::Ratios.sheet_name().to_string(),
        header,
        rows,
    }
}
