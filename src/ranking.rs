use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::debug;

use crate::markdown::TextTable;
use crate::table::{TEAM_COLUMN, Table, TableError};

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    /// 1-based position after sorting; this is what the table displays.
    pub position: usize,
    /// Competition ("min") rank: tied values share the lowest position among
    /// them, missing values share the bottom rank.
    pub rank: usize,
    pub team: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankBlock {
    pub metric: String,
    pub entries: Vec<RankEntry>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankingTable {
    pub index: Vec<usize>,
    pub blocks: Vec<RankBlock>,
}

impl RankingTable {
    pub fn to_text_table(&self) -> TextTable {
        let mut headers = vec!["rank".to_string()];
        for block in &self.blocks {
            headers.push(format!("team_{}", block.metric));
            headers.push(block.metric.clone());
        }
        let mut table = TextTable::new(headers, Vec::new());
        for (i, pos) in self.index.iter().enumerate() {
            let mut row = vec![pos.to_string()];
            for block in &self.blocks {
                match block.entries.get(i) {
                    Some(entry) => {
                        row.push(entry.team.clone());
                        row.push(format_value(entry.value));
                    }
                    None => {
                        row.push(String::new());
                        row.push(String::new());
                    }
                }
            }
            table.push(row);
        }
        table
    }

    pub fn to_markdown(&self) -> String {
        self.to_text_table().to_markdown()
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Descending, missing values last. Equal values keep table order.
fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn rank_metric(table: &Table, metric: &str) -> Result<Option<RankBlock>, TableError> {
    let team_col = table.require_column(TEAM_COLUMN)?;
    let Some(col) = table.column_index(metric) else {
        return Ok(None);
    };

    let mut rows: Vec<(String, Option<f64>)> = (0..table.len())
        .map(|r| {
            let team = table
                .cell(r, team_col)
                .map(|c| c.to_string())
                .unwrap_or_default();
            (team, table.cell(r, col).and_then(|c| c.as_f64()))
        })
        .collect();
    rows.sort_by(|a, b| compare_desc(a.1, b.1));

    let present = rows.iter().filter(|(_, v)| v.is_some()).count();
    let mut entries: Vec<RankEntry> = Vec::with_capacity(rows.len());
    for (i, (team, value)) in rows.into_iter().enumerate() {
        let rank = match value {
            None => present + 1,
            Some(v) => match entries.last() {
                Some(prev) if prev.value == Some(v) => prev.rank,
                _ => i + 1,
            },
        };
        entries.push(RankEntry {
            position: i + 1,
            rank,
            team,
            value,
        });
    }

    Ok(Some(RankBlock {
        metric: metric.to_string(),
        entries,
    }))
}

pub fn ranking_table(
    table: &Table,
    dates: &[NaiveDate],
    metrics: &[String],
) -> Result<RankingTable, TableError> {
    let filtered = table.filter_dates(dates);
    let mut blocks = Vec::new();
    if !filtered.is_empty() {
        for metric in metrics {
            match rank_metric(&filtered, metric)? {
                Some(block) => blocks.push(block),
                None => debug!(metric = %metric, "metric absent from ranking table"),
            }
        }
    }
    Ok(RankingTable {
        index: (1..=filtered.len()).collect(),
        blocks,
    })
}
