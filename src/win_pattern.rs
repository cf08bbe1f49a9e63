use std::collections::HashMap;

use tracing::debug;

use crate::compare::{Arrow, MetricOrientation, signed_diff};
use crate::markdown::{Align, TextTable};
use crate::pairing::{pair_matches, win_rows};
use crate::table::{Cell, RowRef, Table, TableError};

pub const NO_WINS_MESSAGE: &str = "⚠️ No winning matches found.";
pub const COMMENT_PLACEHOLDER: &str = "[commentary]";

#[derive(Debug, Clone, PartialEq)]
pub struct MetricComparison {
    pub metric: String,
    pub win_mean: f64,
    pub current: f64,
    pub diff: f64,
    pub arrow: Arrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSkip {
    /// Not a numeric column, or every winning row is empty there.
    NoWinAverage,
    /// The match being compared has no numeric value for it.
    NoCurrentValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WinPattern {
    NoWins,
    Comparison {
        win_rows: Vec<usize>,
        rows: Vec<MetricComparison>,
        skipped: Vec<(String, MetricSkip)>,
    },
}

impl WinPattern {
    pub fn to_markdown(&self) -> String {
        match self {
            WinPattern::NoWins => NO_WINS_MESSAGE.to_string(),
            WinPattern::Comparison { rows, .. } => comparison_table(rows).to_markdown(),
        }
    }
}

pub fn numeric_means(table: &Table, rows: &[usize]) -> HashMap<String, f64> {
    let mut out = HashMap::new();
    for (col, name) in table.columns().iter().enumerate() {
        if out.contains_key(name) || !table.is_numeric_column(col) {
            continue;
        }
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|&r| match table.cell(r, col) {
                Some(Cell::Number(v)) if v.is_finite() => Some(*v),
                _ => None,
            })
            .collect();
        if values.is_empty() {
            continue;
        }
        out.insert(name.clone(), values.iter().sum::<f64>() / values.len() as f64);
    }
    out
}

/// Averages `metrics` over the matches `team` won and compares `current` against
/// that average. `current` may come from a different table than `table`.
pub fn win_pattern(
    table: &Table,
    team: &str,
    current: RowRef<'_>,
    metrics: &[String],
    orientation: &MetricOrientation,
) -> Result<WinPattern, TableError> {
    let pairs = pair_matches(table);
    let wins = win_rows(table, &pairs, team)?;
    if wins.is_empty() {
        debug!(team, pairs = pairs.len(), "no winning matches");
        return Ok(WinPattern::NoWins);
    }

    let means = numeric_means(table, &wins);
    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for metric in metrics {
        let Some(win_mean) = means.get(metric).copied() else {
            debug!(metric = %metric, "no win average");
            skipped.push((metric.clone(), MetricSkip::NoWinAverage));
            continue;
        };
        let Some(value) = current.number(metric) else {
            debug!(metric = %metric, "no value in compared match");
            skipped.push((metric.clone(), MetricSkip::NoCurrentValue));
            continue;
        };
        let diff = value - win_mean;
        rows.push(MetricComparison {
            metric: metric.clone(),
            win_mean,
            current: value,
            diff,
            arrow: orientation.arrow(metric, diff),
        });
    }

    Ok(WinPattern::Comparison {
        win_rows: wins,
        rows,
        skipped,
    })
}

fn comparison_table(rows: &[MetricComparison]) -> TextTable {
    let mut table = TextTable::new(
        ["Metric", "Win average", "This match", "Diff", "Comment"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![Align::Left, Align::Right, Align::Right, Align::Right, Align::Left],
    );
    for row in rows {
        table.push(vec![
            row.metric.clone(),
            format!("{:.2}", row.win_mean),
            format!("{:.2}", row.current),
            signed_diff(row.arrow, row.diff),
            COMMENT_PLACEHOLDER.to_string(),
        ]);
    }
    table
}
