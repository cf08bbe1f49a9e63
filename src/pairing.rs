use crate::table::{GOALS_COLUMN, TEAM_COLUMN, Table, TableError};

pub const AVERAGE_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPair {
    pub first: usize,
    pub second: usize,
}

impl MatchPair {
    pub fn partner_of(&self, row: usize) -> Option<usize> {
        if row == self.first {
            Some(self.second)
        } else if row == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

pub fn pair_matches(table: &Table) -> Vec<MatchPair> {
    pair_rows(table.len(), AVERAGE_ROWS)
}

pub fn pair_rows(len: usize, skip: usize) -> Vec<MatchPair> {
    (skip..len.saturating_sub(1))
        .step_by(2)
        .map(|first| MatchPair {
            first,
            second: first + 1,
        })
        .collect()
}

/// Row indices where `team` scored strictly more goals than its paired row,
/// in table order. Rows without a numeric goal count never win.
pub fn win_rows(table: &Table, pairs: &[MatchPair], team: &str) -> Result<Vec<usize>, TableError> {
    let team_col = table.require_column(TEAM_COLUMN)?;
    let goals_col = table.require_column(GOALS_COLUMN)?;

    let team_at = |row: usize| table.cell(row, team_col).and_then(|c| c.as_str());
    let goals_at = |row: usize| table.cell(row, goals_col).and_then(|c| c.as_f64());

    let mut out = Vec::new();
    for pair in pairs {
        let won = [pair.first, pair.second].into_iter().find(|&row| {
            if team_at(row) != Some(team) {
                return false;
            }
            let Some(partner) = pair.partner_of(row) else {
                return false;
            };
            matches!((goals_at(row), goals_at(partner)), (Some(g), Some(o)) if g > o)
        });
        out.extend(won);
    }
    Ok(out)
}
