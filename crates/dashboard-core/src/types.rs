use crate::DashboardError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticker symbol, upper-cased. The sole key for every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Parse user input: trims whitespace and upper-cases.
    pub fn parse(input: &str) -> Result<Self, DashboardError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DashboardError::InvalidSymbol("empty ticker".to_string()));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
        {
            return Err(DashboardError::InvalidSymbol(format!(
                "unexpected character '{}' in '{}'",
                bad, trimmed
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The seven datasets a dashboard is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Profile,
    MonthlyPrices,
    IncomeStatement,
    BalanceSheet,
    CashFlow,
    KeyMetrics,
    Ratios,
}

impl EndpointKind {
    /// Dashboard order.
    pub const ALL: [EndpointKind; 7] = [
        EndpointKind::Profile,
        EndpointKind::MonthlyPrices,
        EndpointKind::IncomeStatement,
        EndpointKind::BalanceSheet,
        EndpointKind::CashFlow,
        EndpointKind::KeyMetrics,
        EndpointKind::Ratios,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EndpointKind::Profile => "Company Profile",
            EndpointKind::MonthlyPrices => "Market Performance",
            EndpointKind::IncomeStatement => "Income Statement",
            EndpointKind::BalanceSheet => "Balance Sheet",
            EndpointKind::CashFlow => "Cash Flow",
            EndpointKind::KeyMetrics => "Key Metrics",
            EndpointKind::Ratios => "Financial Ratios",
        }
    }

    /// Sheet name used by the spreadsheet export.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            EndpointKind::Profile => "Stock",
            EndpointKind::MonthlyPrices => "Market Performance",
            EndpointKind::IncomeStatement => "Income Statement",
            EndpointKind::BalanceSheet => "Balance Sheet",
            EndpointKind::CashFlow => "Cash flow",
            EndpointKind::KeyMetrics => "Key Metrics",
            EndpointKind::Ratios => "Financial Ratios",
        }
    }

    /// Statements keyed by reporting year rather than by date or by field name.
    pub fn is_year_keyed(&self) -> bool {
        !matches!(self, EndpointKind::Profile | EndpointKind::MonthlyPrices)
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upstream market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Fmp,
    AlphaVantage,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Fmp => "Financial Modeling Prep",
            Provider::AlphaVantage => "Alpha Vantage",
        }
    }
}

/// Decoded provider response, unmodified, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub provider: Provider,
    pub kind: EndpointKind,
    pub body: serde_json::Value,
}

/// A single company profile value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Number(f64),
    Text(String),
    Missing,
}

impl ProfileValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ProfileValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProfileValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ProfileValue::Missing)
    }
}

impl fmt::Display for ProfileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            ProfileValue::Number(n) => write!(f, "{}", n),
            ProfileValue::Text(s) => f.write_str(s),
            ProfileValue::Missing => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileField {
    pub name: String,
    pub value: ProfileValue,
}

/// Company profile: named fields in canonical order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: Symbol,
    pub fields: Vec<ProfileField>,
}

impl CompanyProfile {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: ProfileValue) {
        self.fields.push(ProfileField {
            name: name.into(),
            value,
        });
    }

    pub fn get(&self, name: &str) -> Option<&ProfileValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_f64())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProfileValue)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.value))
    }
}

/// One reporting period of a statement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub period: String,
    /// Aligned with the owning table's `columns`. `None` when the provider sent null.
    pub values: Vec<Option<f64>>,
}

/// Time-indexed statement table, rows ordered most recent period first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub kind: EndpointKind,
    pub columns: Vec<String>,
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    pub fn new(kind: EndpointKind, columns: Vec<String>) -> Self {
        Self {
            kind,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, period: impl Into<String>, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(StatementRow {
            period: period.into(),
            values,
        });
    }

    /// Restore the most-recent-first invariant. Stable for equal periods.
    pub fn sort_most_recent_first(&mut self) {
        self.rows.sort_by(|a, b| b.period.cmp(&a.period));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == field)
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.column_index(field).is_some()
    }

    /// Cell at `row` (0 = most recent) for `field`.
    pub fn value(&self, row: usize, field: &str) -> Option<f64> {
        let idx = self.column_index(field)?;
        self.rows.get(row).and_then(|r| r.values.get(idx).copied().flatten())
    }

    pub fn column(&self, field: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(field)?;
        Some(self.rows.iter().map(|r| r.values.get(idx).copied().flatten()).collect())
    }

    pub fn row(&self, period: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|r| r.period == period)
    }

    pub fn latest(&self) -> Option<&StatementRow> {
        self.rows.first()
    }

    pub fn periods(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.period.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Closing prices, most recent first, bounded to a look-back window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn oldest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_change(value: f64) -> Self {
        if value > 0.0 {
            Trend::Up
        } else if value < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// Period-over-period percentage change of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub field: String,
    pub value: f64,
}

impl Delta {
    /// Unformatted percentage, e.g. `12.5` for +12.5%.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn trend(&self) -> Trend {
        Trend::from_change(self.value)
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.value)
    }
}

/// Output of normalizing one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Normalized {
    Profile(CompanyProfile),
    Prices(PriceSeries),
    Statement(StatementTable),
}

impl Normalized {
    pub fn into_profile(self) -> Option<CompanyProfile> {
        match self {
            Normalized::Profile(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_prices(self) -> Option<PriceSeries> {
        match self {
            Normalized::Prices(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_statement(self) -> Option<StatementTable> {
        match self {
            Normalized::Statement(t) => Some(t),
            _ => None,
        }
    }
}
