use chrono::{DateTime, Utc};
use dashboard_core::{
    CompanyProfile, DashboardError, EndpointKind, PriceSeries, StatementTable, Symbol,
};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// One dashboard section: either its data or the reason it is unavailable.
pub type Section<T> = Result<T, DashboardError>;

/// What to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRequest {
    pub symbol: Symbol,
    /// Skip the cache and refetch every dataset.
    pub force_refresh: bool,
}

impl DashboardRequest {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            force_refresh: false,
        }
    }

    pub fn refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// Everything the dashboard shows for one symbol. Sections fail
/// independently.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub symbol: Symbol,
    #[serde(serialize_with = "serialize_section")]
    pub profile: Section<CompanyProfile>,
    #[serde(serialize_with = "serialize_section")]
    pub prices: Section<PriceSeries>,
    #[serde(serialize_with = "serialize_section")]
    pub income: Section<StatementTable>,
    #[serde(serialize_with = "serialize_section")]
    pub balance_sheet: Section<StatementTable>,
    #[serde(serialize_with = "serialize_section")]
    pub cash_flow: Section<StatementTable>,
    #[serde(serialize_with = "serialize_section")]
    pub key_metrics: Section<StatementTable>,
    #[serde(serialize_with = "serialize_section")]
    pub ratios: Section<StatementTable>,
    pub loaded_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// Year-keyed section for `kind`; `None` for profile and prices.
    pub fn statement(&self, kind: EndpointKind) -> Option<&Section<StatementTable>> {
        match kind {
            EndpointKind::IncomeStatement => Some(&self.income),
            EndpointKind::BalanceSheet => Some(&self.balance_sheet),
            EndpointKind::CashFlow => Some(&self.cash_flow),
            EndpointKind::KeyMetrics => Some(&self.key_metrics),
            EndpointKind::Ratios => Some(&self.ratios),
            EndpointKind::Profile | EndpointKind::MonthlyPrices => None,
        }
    }

    pub fn error(&self, kind: EndpointKind) -> Option<&DashboardError> {
        match kind {
            EndpointKind::Profile => self.profile.as_ref().err(),
            EndpointKind::MonthlyPrices => self.prices.as_ref().err(),
            _ => self.statement(kind).and_then(|s| s.as_ref().err()),
        }
    }

    /// Degraded sections in dashboard order.
    pub fn unavailable(&self) -> Vec<(EndpointKind, &DashboardError)> {
        EndpointKind::ALL
            .iter()
            .filter_map(|kind| self.error(*kind).map(|e| (*kind, e)))
            .collect()
    }

    /// True when not a single section loaded.
    pub fn is_empty(&self) -> bool {
        self.unavailable().len() == EndpointKind::ALL.len()
    }
}

fn serialize_section<T, S>(section: &Section<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match section {
        Ok(data) => {
            let mut state = serializer.serialize_struct("Section", 2)?;
            state.serialize_field("status", "ok")?;
            state.serialize_field("data", data)?;
            state.end()
        }
        Err(e) => {
            let mut state = serializer.serialize_struct("Section", 3)?;
            state.serialize_field("status", "unavailable")?;
            state.serialize_field("message", &e.user_message())?;
            state.serialize_field("detail", &e.to_string())?;
            state.end()
        }
    }
}
