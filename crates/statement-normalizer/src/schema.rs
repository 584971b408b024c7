//! Declarative field mappings, one table per provider endpoint.
//!
//! Each entry maps a provider key to the canonical column name shown on the
//! dashboard. Changing a provider means adding a table here, not touching the
//! extraction code.

use dashboard_core::{EndpointKind, Provider};

/// How a row's reporting year is read from the provider record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKey {
    /// `calendarYear` field, used as-is.
    CalendarYear,
    /// Leading segment of `date` split on `-` ("2022-09-24" -> "2022").
    DateYear,
}

impl PeriodKey {
    pub fn source_field(&self) -> &'static str {
        match self {
            PeriodKey::CalendarYear => "calendarYear",
            PeriodKey::DateYear => "date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Currency amounts and plotted margins keep full precision.
    Raw,
    /// Computed ratios are rounded to two decimals.
    TwoDecimals,
}

impl Rounding {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Rounding::Raw => value,
            Rounding::TwoDecimals => (value * 100.0).round() / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub source: &'static str,
    pub canonical: &'static str,
    pub rounding: Rounding,
}

const fn raw(source: &'static str, canonical: &'static str) -> FieldSpec {
    FieldSpec {
        source,
        canonical,
        rounding: Rounding::Raw,
    }
}

const fn ratio(source: &'static str, canonical: &'static str) -> FieldSpec {
    FieldSpec {
        source,
        canonical,
        rounding: Rounding::TwoDecimals,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementSchema {
    pub kind: EndpointKind,
    pub period: PeriodKey,
    pub fields: &'static [FieldSpec],
}

impl StatementSchema {
    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.canonical.to_string()).collect()
    }
}

pub const INCOME_STATEMENT: StatementSchema = StatementSchema {
    kind: EndpointKind::IncomeStatement,
    period: PeriodKey::CalendarYear,
    fields: &[
        raw("revenue", "Revenue"),
        raw("costOfRevenue", "(-) Cost of Revenue"),
        raw("grossProfit", "= Gross Profit"),
        raw("operatingExpenses", "(-) Operating Expense"),
        raw("operatingIncome", "= Operating Income"),
        raw("totalOtherIncomeExpensesNet", "(+/-) Other Income/Expenses"),
        raw("incomeBeforeTax", "= Income Before Tax"),
        raw("incomeTaxExpense", "(+/-) Tax Income/Expense"),
        raw("netIncome", "= Net Income"),
    ],
};

pub const BALANCE_SHEET: StatementSchema = StatementSchema {
    kind: EndpointKind::BalanceSheet,
    period: PeriodKey::CalendarYear,
    fields: &[
        raw("totalAssets", "Assets"),
        raw("totalCurrentAssets", "Current Assets"),
        raw("totalNonCurrentAssets", "Non-Current Assets"),
        raw("totalCurrentLiabilities", "Current Liabilities"),
        raw("totalNonCurrentLiabilities", "Non-Current Liabilities"),
        raw("totalLiabilities", "Liabilities"),
        raw("totalEquity", "Equity"),
    ],
};

// `netCashUsedForInvestingActivites` is FMP's spelling.
pub const CASH_FLOW: StatementSchema = StatementSchema {
    kind: EndpointKind::CashFlow,
    period: PeriodKey::DateYear,
    fields: &[
        raw("netCashProvidedByOperatingActivities", "Cash flows from operating activities"),
        raw("netCashUsedForInvestingActivites", "Cash flows from investing activities"),
        raw("netCashUsedProvidedByFinancingActivities", "Cash flows from financing activities"),
        raw("freeCashFlow", "Free cash flow"),
    ],
};

pub const KEY_METRICS: StatementSchema = StatementSchema {
    kind: EndpointKind::KeyMetrics,
    period: PeriodKey::DateYear,
    fields: &[
        raw("marketCap", "Market Cap"),
        raw("workingCapital", "Working Capital"),
        raw("debtToEquity", "D/E ratio"),
        raw("peRatio", "P/E Ratio"),
        raw("roe", "ROE"),
        raw("dividendYield", "Dividend Yield"),
    ],
};

pub const RATIOS: StatementSchema = StatementSchema {
    kind: EndpointKind::Ratios,
    period: PeriodKey::DateYear,
    fields: &[
        ratio("currentRatio", "Current Ratio"),
        ratio("quickRatio", "Quick Ratio"),
        ratio("cashRatio", "Cash Ratio"),
        ratio("daysOfSalesOutstanding", "Days of Sales Outstanding"),
        ratio("daysOfInventoryOutstanding", "Days of Inventory Outstanding"),
        ratio("operatingCycle", "Operating Cycle"),
        ratio("daysOfPayablesOutstanding", "Days of Payables Outstanding"),
        ratio("cashConversionCycle", "Cash Conversion Cycle"),
        raw("grossProfitMargin", "Gross Profit Margin"),
        ratio("operatingProfitMargin", "Operating Profit Margin"),
        ratio("pretaxProfitMargin", "Pretax Profit Margin"),
        raw("netProfitMargin", "Net Profit Margin"),
        ratio("effectiveTaxRate", "Effective Tax Rate"),
        ratio("returnOnAssets", "Return on Assets"),
        ratio("returnOnEquity", "Return on Equity"),
        ratio("returnOnCapitalEmployed", "Return on Capital Employed"),
        ratio("netIncomePerEBT", "Net Income per EBT"),
        ratio("ebtPerEbit", "EBT per EBIT"),
        ratio("ebitPerRevenue", "EBIT per Revenue"),
        ratio("debtRatio", "Debt Ratio"),
        ratio("debtEquityRatio", "Debt Equity Ratio"),
        ratio("longTermDebtToCapitalization", "Long-term Debt to Capitalization"),
        ratio("totalDebtToCapitalization", "Total Debt to Capitalization"),
        ratio("interestCoverage", "Interest Coverage"),
        ratio("cashFlowToDebtRatio", "Cash Flow to Debt Ratio"),
        ratio("companyEquityMultiplier", "Company Equity Multiplier"),
        ratio("receivablesTurnover", "Receivables Turnover"),
        ratio("payablesTurnover", "Payables Turnover"),
        ratio("inventoryTurnover", "Inventory Turnover"),
        ratio("fixedAssetTurnover", "Fixed Asset Turnover"),
        ratio("assetTurnover", "Asset Turnover"),
        ratio("operatingCashFlowPerShare", "Operating Cash Flow per Share"),
        ratio("freeCashFlowPerShare", "Free Cash Flow per Share"),
        ratio("cashPerShare", "Cash per Share"),
        ratio("payoutRatio", "Payout Ratio"),
        ratio("operatingCashFlowSalesRatio", "Operating Cash Flow Sales Ratio"),
        ratio("freeCashFlowOperatingCashFlowRatio", "Free Cash Flow Operating Cash Flow Ratio"),
        ratio("cashFlowCoverageRatios", "Cash Flow Coverage Ratios"),
        ratio("priceToBookRatio", "Price to Book Value Ratio"),
        ratio("priceEarningsRatio", "Price to Earnings Ratio"),
        ratio("priceToSalesRatio", "Price to Sales Ratio"),
        raw("dividendYield", "Dividend Yield"),
        ratio("enterpriseValueMultiple", "Enterprise Value to EBITDA"),
        ratio("priceFairValue", "Price to Fair Value"),
    ],
};

/// Statement mapping for a provider, if it serves that statement.
pub fn statement_schema(
    provider: Provider,
    kind: EndpointKind,
) -> Option<&'static StatementSchema> {
    match (provider, kind) {
        (Provider::Fmp, EndpointKind::IncomeStatement) => Some(&INCOME_STATEMENT),
        (Provider::Fmp, EndpointKind::BalanceSheet) => Some(&BALANCE_SHEET),
        (Provider::Fmp, EndpointKind::CashFlow) => Some(&CASH_FLOW),
        (Provider::Fmp, EndpointKind::KeyMetrics) => Some(&KEY_METRICS),
        (Provider::Fmp, EndpointKind::Ratios) => Some(&RATIOS),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSpec {
    pub source: &'static str,
    pub canonical: &'static str,
    pub value: ValueKind,
}

const fn text(source: &'static str, canonical: &'static str) -> ProfileSpec {
    ProfileSpec {
        source,
        canonical,
        value: ValueKind::Text,
    }
}

const fn number(source: &'static str, canonical: &'static str) -> ProfileSpec {
    ProfileSpec {
        source,
        canonical,
        value: ValueKind::Number,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSchema {
    pub provider: Provider,
    /// Field that must be present for the record to count as a profile.
    pub identity: &'static str,
    pub fields: &'static [ProfileSpec],
}

pub const FMP_PROFILE: ProfileSchema = ProfileSchema {
    provider: Provider::Fmp,
    identity: "companyName",
    fields: &[
        text("companyName", "Name"),
        text("exchangeShortName", "Exchange"),
        text("currency", "Currency"),
        text("sector", "Sector"),
        number("mktCap", "Market Cap"),
        number("price", "Price"),
        number("changes", "Price change"),
        number("beta", "Beta"),
        text("website", "Website"),
        text("image", "Image"),
    ],
};

pub const ALPHA_VANTAGE_OVERVIEW: ProfileSchema = ProfileSchema {
    provider: Provider::AlphaVantage,
    identity: "Name",
    fields: &[
        text("Name", "Name"),
        text("Exchange", "Exchange"),
        text("Currency", "Currency"),
        text("Sector", "Sector"),
        number("MarketCapitalization", "Market Cap"),
        number("PERatio", "P/E ratio"),
        number("DividendYield", "Dividends (Yield)"),
        number("ProfitMargin", "Profit Margin"),
        number("Beta", "Beta"),
        number("EPS", "EPS"),
    ],
};

pub fn profile_schema(provider: Provider) -> &'static ProfileSchema {
    match provider {
        Provider::Fmp => &FMP_PROFILE,
        Provider::AlphaVantage => &ALPHA_VANTAGE_OVERVIEW,
    }
}

/// Alpha Vantage monthly series container and the close field kept from it.
pub const MONTHLY_SERIES_KEY: &str = "Monthly Adjusted Time Series";
pub const MONTHLY_CLOSE_KEY: &str = "4. close";
