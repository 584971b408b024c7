//! Export encoder
//!
//! Lays a dashboard snapshot out as a workbook of named sheets and writes it
//! as a directory of CSV files, one per sheet.

pub mod sheets;

pub use sheets::{clean_header, Sheet};

use dashboard_core::{DashboardError, EndpointKind, Symbol};
use dashboard_orchestrator::DashboardSnapshot;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// One sheet per available section, in dashboard order. Sections that
    /// failed to load are left out.
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Result<Self, DashboardError> {
        let mut sheets = Vec::new();

        if let Ok(profile) = &snapshot.profile {
            sheets.push(sheets::profile_sheet(profile));
        }
        if let Ok(prices) = &snapshot.prices {
            sheets.push(sheets::price_sheet(prices));
        }
        for kind in EndpointKind::ALL.iter().filter(|k| k.is_year_keyed()) {
            if let Some(Ok(table)) = snapshot.statement(*kind) {
                sheets.push(sheets::statement_sheet(table));
            }
        }

        if sheets.is_empty() {
            return Err(DashboardError::Export(format!(
                "no sections available for {}",
                snapshot.symbol
            )));
        }

        Ok(Self { sheets })
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Write every sheet under `parent/<SYMBOL>_financial_data/` and return
    /// that directory.
    pub fn write_dir(&self, parent: &Path, symbol: &Symbol) -> Result<PathBuf, DashboardError> {
        if self.sheets.is_empty() {
            return Err(DashboardError::Export("workbook has no sheets".to_string()));
        }

        let dir = parent.join(export_dir_name(symbol));
        fs::create_dir_all(&dir).map_err(|e| export_error(&dir, e))?;

        for sheet in &self.sheets {
            let path = dir.join(file_name(&sheet.name));
            let mut writer = csv::Writer::from_path(&path).map_err(|e| export_error(&path, e))?;
            writer
                .write_record(&sheet.header)
                .map_err(|e| export_error(&path, e))?;
            for row in &sheet.rows {
                writer.write_record(row).map_err(|e| export_error(&path, e))?;
            }
            writer.flush().map_err(|e| export_error(&path, e))?;
        }

        tracing::info!("Exported {} sheets to {}", self.sheets.len(), dir.display());
        Ok(dir)
    }

    /// Load a workbook written by [`Workbook::write_dir`]. Sheets are read in
    /// dashboard order; files that are not dashboard sheets are ignored.
    pub fn read_dir(dir: &Path) -> Result<Self, DashboardError> {
        let mut sheets = Vec::new();

        for kind in EndpointKind::ALL {
            let path = dir.join(file_name(kind.sheet_name()));
            if !path.exists() {
                continue;
            }

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_path(&path)
                .map_err(|e| export_error(&path, e))?;

            let header = reader
                .headers()
                .map_err(|e| export_error(&path, e))?
                .iter()
                .map(str::to_string)
                .collect();

            let mut rows = Vec::new();
            for record in reader.records() {
                let record = record.map_err(|e| export_error(&path, e))?;
                rows.push(record.iter().map(str::to_string).collect());
            }

            sheets.push(Sheet {
                name: kind.sheet_name().to_string(),
                header,
                rows,
            });
        }

        if sheets.is_empty() {
            return Err(DashboardError::Export(format!(
                "no sheets found in {}",
                dir.display()
            )));
        }

        Ok(Self { sheets })
    }
}

/// `AAPL` -> `AAPL_financial_data`
pub fn export_dir_name(symbol: &Symbol) -> String {
    format!("{}_financial_data", symbol)
}

/// `Market Performance` -> `market_performance.csv`
pub fn file_name(sheet_name: &str) -> String {
    format!("{}.csv", sheet_name.to_lowercase().replace(' ', "_"))
}

fn export_error(path: &Path, e: impl std::fmt::Display) -> DashboardError {
    DashboardError::Export(format!("{}: {}", path.display(), e))
}
