use std::fmt;

use rayon::prelude::*;
use tracing::debug;

use crate::table::{Cell, Table};

const STD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    High,
    Low,
}

impl Direction {
    pub fn from_z(z: f64) -> Self {
        if z > 0.0 { Direction::High } else { Direction::Low }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::High => "high",
            Direction::Low => "low",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outlier {
    pub metric: String,
    pub z_score: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZSkip {
    MissingColumn,
    NonNumeric,
    TooFewRows,
    ZeroVariance,
    RowOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

/// Population mean and standard deviation. `None` below two values or when the
/// spread is effectively zero.
pub fn column_stats(values: &[f64]) -> Option<ColumnStats> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std <= STD_EPSILON {
        None
    } else {
        Some(ColumnStats { mean, std })
    }
}

/// z-score of `row` within `column`. Every cell of the column must be numeric:
/// one gap poisons the whole distribution.
pub fn zscore_at(table: &Table, column: &str, row: usize) -> Result<f64, ZSkip> {
    if row >= table.len() {
        return Err(ZSkip::RowOutOfRange);
    }
    if !table.has_column(column) {
        return Err(ZSkip::MissingColumn);
    }
    let values = table
        .column_cells(column)
        .map(|cell| match cell {
            Cell::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        })
        .collect::<Option<Vec<f64>>>()
        .ok_or(ZSkip::NonNumeric)?;
    if values.len() < 2 {
        return Err(ZSkip::TooFewRows);
    }
    let stats = column_stats(&values).ok_or(ZSkip::ZeroVariance)?;
    Ok((values[row] - stats.mean) / stats.std)
}

pub fn zscores_for_row(table: &Table, columns: &[String], row: usize) -> Vec<(String, Result<f64, ZSkip>)> {
    columns
        .par_iter()
        .map(|col| (col.clone(), zscore_at(table, col, row)))
        .collect()
}

/// The `n` metrics of `row` furthest from their column mean, keeping those with
/// `|z| >= threshold`. Ties keep the order of `columns`.
pub fn top_outliers(
    table: &Table,
    columns: &[String],
    row: usize,
    n: usize,
    threshold: f64,
) -> Vec<Outlier> {
    let mut hits: Vec<Outlier> = Vec::new();
    for (metric, z) in zscores_for_row(table, columns, row) {
        match z {
            Ok(z) if z.abs() >= threshold => hits.push(Outlier {
                metric,
                z_score: z,
                direction: Direction::from_z(z),
            }),
            Ok(_) => {}
            Err(reason) => debug!(metric = %metric, ?reason, "z-score skipped"),
        }
    }
    hits.sort_by(|a, b| b.z_score.abs().total_cmp(&a.z_score.abs()));
    hits.truncate(n);
    hits
}
