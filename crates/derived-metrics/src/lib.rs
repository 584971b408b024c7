//! Derived metrics
//!
//! Pure computations over normalized tables: period-over-period deltas, the
//! headline metric cards, the financial-ratio view and display formatting.

pub mod delta;
pub mod format;
pub mod headline;
pub mod ratios;
pub mod statements;

pub use delta::delta;
pub use format::{millify, percent, round2};
pub use headline::{headline_metrics, MetricCard};
pub use ratios::{display_name, ratio_display_table, RatioRow, RatioView};
pub use statements::{income_statement_for_year, price_trend, IncomeLine};
