use dashboard_core::{DashboardError, Delta, StatementTable};

/// Percentage change of `field` between the two most recent periods.
///
/// Row 0 is the current period, row 1 the previous one. When either value is
/// non-positive the change is taken against `|previous|`, so a loss that
/// shrinks from -20 to -10 reads as +50%.
pub fn delta(table: &StatementTable, field: &str) -> Result<Delta, DashboardError> {
    let idx = table
        .column_index(field)
        .ok_or_else(|| DashboardError::FieldNotFound {
            field: field.to_string(),
        })?;

    if table.len() < 2 {
        return Err(DashboardError::InsufficientData {
            field: field.to_string(),
            rows: table.len(),
        });
    }

    let cell = |row: usize| {
        let row = &table.rows[row];
        row.values.get(idx).copied().flatten().ok_or_else(|| DashboardError::MissingValue {
            field: field.to_string(),
            period: row.period.clone(),
        })
    };
    let current = cell(0)?;
    let previous = cell(1)?;

    Ok(Delta {
        field: field.to_string(),
        value: percent_change(field, current, previous)?,
    })
}

fn percent_change(field: &str, current: f64, previous: f64) -> Result<f64, DashboardError> {
    if previous == 0.0 {
        return Err(DashboardError::ZeroBaseline {
            field: field.to_string(),
        });
    }

    let change = if current <= 0.0 || previous <= 0.0 {
        (current - previous) / previous.abs() * 100.0
    } else {
        (current - previous) / previous * 100.0
    };
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{EndpointKind, StatementRow, Trend};

    fn table(values: &[(&str, Option<f64>)]) -> StatementTable {
        let mut table = StatementTable::new(EndpointKind::KeyMetrics, vec!["ROE".to_string()]);
        for (period, value) in values {
            table.push_row(*period, vec![*value]);
        }
        table
    }

    #[test]
    fn test_positive_growth() {
        let t = table(&[("2023", Some(120.0)), ("2022", Some(100.0))]);
        let d = delta(&t, "ROE").unwrap();
        assert!((d.value() - 20.0).abs() < 1e-9);
        assert_eq!(d.to_string(), "20.00%");
        assert_eq!(d.trend(), Trend::Up);
    }

    #[test]
    fn test_shrinking_loss_is_positive() {
        let t = table(&[("2023", Some(-10.0)), ("2022", Some(-20.0))]);
        let d = delta(&t, "ROE").unwrap();
        assert_eq!(d.to_string(), "50.00%");
        assert_eq!(d.trend(), Trend::Up);
    }

    #[test]
    fn test_swing_to_loss() {
        let t = table(&[("2023", Some(-5.0)), ("2022", Some(10.0))]);
        assert_eq!(delta(&t, "ROE").unwrap().to_string(), "-150.00%");
    }

    #[test]
    fn test_only_first_two_rows_used() {
        let t = table(&[("2023", Some(110.0)), ("2022", Some(100.0)), ("2021", None)]);
        assert_eq!(delta(&t, "ROE").unwrap().to_string(), "10.00%");
    }

    #[test]
    fn test_single_row_is_insufficient() {
        let t = table(&[("2023", Some(1.0))]);
        assert_eq!(
            delta(&t, "ROE").unwrap_err(),
            DashboardError::InsufficientData {
                field: "ROE".to_string(),
                rows: 1
            }
        );
    }

    #[test]
    fn test_unknown_field() {
        let t = table(&[("2023", Some(1.0)), ("2022", Some(2.0))]);
        assert!(matches!(
            delta(&t, "EPS"),
            Err(DashboardError::FieldNotFound { field }) if field == "EPS"
        ));
    }

    #[test]
    fn test_null_cell_reports_period() {
        let t = table(&[("2023", Some(1.0)), ("2022", None)]);
        assert_eq!(
            delta(&t, "ROE").unwrap_err(),
            DashboardError::MissingValue {
                field: "ROE".to_string(),
                period: "2022".to_string()
            }
        );
    }

    #[test]
    fn test_short_row_is_missing_value() {
        let mut t = StatementTable::new(
            EndpointKind::KeyMetrics,
            vec!["Market Cap".to_string(), "ROE".to_string()],
        );
        t.push_row("2023", vec![Some(2.0), Some(1.5)]);
        t.rows.push(StatementRow {
            period: "2022".to_string(),
            values: vec![Some(1.0)],
        });

        assert_eq!(
            delta(&t, "ROE").unwrap_err(),
            DashboardError::MissingValue {
                field: "ROE".to_string(),
                period: "2022".to_string()
            }
        );
    }

    #[test]
    fn test_zero_baseline() {
        let t = table(&[("2023", Some(5.0)), ("2022", Some(0.0))]);
        assert!(matches!(delta(&t, "ROE"), Err(DashboardError::ZeroBaseline { .. })));
    }

    #[test]
    fn test_flat() {
        let t = table(&[("2023", Some(3.0)), ("2022", Some(3.0))]);
        let d = delta(&t, "ROE").unwrap();
        assert_eq!(d.trend(), Trend::Flat);
        assert_eq!(d.to_string(), "0.00%");
    }
}
