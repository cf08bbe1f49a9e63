use chrono::NaiveDate;

use crate::compare::{MetricOrientation, signed_diff};
use crate::markdown::{Align, TextTable};
use crate::outliers::Outlier;
use crate::table::{DATE_COLUMN, GOALS_COLUMN, RowRef, TEAM_COLUMN, Table, TableError};
use crate::win_pattern::COMMENT_PLACEHOLDER;

pub struct ReportInputs<'a> {
    pub team_row: RowRef<'a>,
    pub opponent_row: RowRef<'a>,
    pub match_date: NaiveDate,
    pub round_label: &'a str,
    pub key_metrics: &'a [String],
    pub key_orientation: &'a MetricOrientation,
    pub outliers: &'a [Outlier],
    pub top_n: usize,
    pub win_pattern: &'a str,
    pub attack_ranking: &'a str,
    pub defense_ranking: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchRows {
    pub team: usize,
    pub opponent: usize,
}

/// First row on `date` belonging to `team`, and the first row on that date
/// that does not. `None` when either is missing.
pub fn find_match_rows(table: &Table, team: &str, date: NaiveDate) -> Result<Option<MatchRows>, TableError> {
    table.require_column(DATE_COLUMN)?;
    table.require_column(TEAM_COLUMN)?;
    let on_date: Vec<usize> = (0..table.len())
        .filter(|&r| table.date(r) == Some(date))
        .collect();
    let team_row = on_date
        .iter()
        .copied()
        .find(|&r| table.text(r, TEAM_COLUMN) == Some(team));
    let opponent_row = on_date
        .iter()
        .copied()
        .find(|&r| table.text(r, TEAM_COLUMN) != Some(team));
    Ok(match (team_row, opponent_row) {
        (Some(team), Some(opponent)) => Some(MatchRows { team, opponent }),
        _ => None,
    })
}

pub fn score_line(team: RowRef<'_>, opponent: RowRef<'_>, date: NaiveDate) -> String {
    let team_name = team.team().unwrap_or_default();
    let opponent_name = opponent.team().unwrap_or_default();
    match (team.goals(), opponent.goals()) {
        (Some(g1), Some(g2)) => format!(
            "{team_name} {} - {} {opponent_name} ({date})",
            g1.trunc() as i64,
            g2.trunc() as i64
        ),
        _ => format!("{team_name} vs {opponent_name} ({date})"),
    }
}

pub fn key_stats_table(
    team: RowRef<'_>,
    opponent: RowRef<'_>,
    metrics: &[String],
    orientation: &MetricOrientation,
) -> TextTable {
    let mut table = TextTable::new(
        ["Metric", "Team", "Opponent", "Diff"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![Align::Left, Align::Right, Align::Right, Align::Right],
    );
    for metric in metrics.iter().filter(|m| m.as_str() != GOALS_COLUMN) {
        let (Some(t), Some(o)) = (team.number(metric), opponent.number(metric)) else {
            continue;
        };
        let diff = t - o;
        table.push(vec![
            metric.clone(),
            format!("{t:.2}"),
            format!("{o:.2}"),
            signed_diff(orientation.arrow(metric, diff), diff),
        ]);
    }
    table
}

pub fn zscore_table(outliers: &[Outlier]) -> TextTable {
    let mut table = TextTable::new(
        ["Metric", "Z-score", "Trend", "Comment"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![Align::Left, Align::Right, Align::Left, Align::Left],
    );
    for o in outliers {
        table.push(vec![
            o.metric.clone(),
            format!("{:+.2}", o.z_score),
            o.direction.to_string(),
            COMMENT_PLACEHOLDER.to_string(),
        ]);
    }
    table
}

pub fn render_report(inputs: &ReportInputs<'_>) -> String {
    let score = score_line(inputs.team_row, inputs.opponent_row, inputs.match_date);
    let key_stats = key_stats_table(
        inputs.team_row,
        inputs.opponent_row,
        inputs.key_metrics,
        inputs.key_orientation,
    )
    .to_markdown();
    let zscores = zscore_table(inputs.outliers).to_markdown();

    format!(
        r#"
Using only what the match data below supports, write the following. Do not invent goal sequences or impressions; every statement must rest on the numbers or the differences between them.

1. Match summary (3-5 lines from xG, goals, possession, PPDA and similar stats)
2. Areas to improve (about 3 lines from low values and gaps)
3. Positives (about 3 lines from favourable metrics)
4. One line of commentary per top z-score metric
5. Observations from the win-pattern comparison (2-3 lines on differences and trends)
6. Cross-team comparison for the round (publish the attack and defence tables, then 2-3 lines of analysis)

Fill in the Markdown below so it can be pasted as is.
---
# ⚽ {round} | {score}

## 🎯 Match overview
[summary]

---

## 🆚 Key stats

The key stats compare the team with its opponent.

- xG (expected goals): probability that each shot becomes a goal, from shot location, angle and situation.
- PPDA (passes per defensive action): passes allowed per defensive action in the opponent's half. Lower means a more aggressive press.
- Possession, %: share of in-play time with the ball.
- Match tempo: passes per minute of possession. Higher means a faster game.
- Average pass length: mean distance of passes.
- Average shot distance: mean distance of shots from goal.
- Shots on target: shots that hit the target frame.

{key_stats}

---

## 🔍 Z-score metrics (top {top_n})

A z-score measures how far a value sits from the average.

- A large positive value means well above average.
- A large negative value means well below average.

{zscores}

---

## 📊 Compared with winning matches (average)

Each metric from this match against the average of the matches the team won.

- How did each metric compare with the winning average?
- What was missing, and what was better?

{win_pattern}

---

## 📊 Cross-team comparison for the round

Where the team sits across the league on this round's metrics.

Attack
{attack}

Defence
{defense}

[analysis]

---

## ⚠️ Areas to improve
[areas to improve]

---

## ✅ Positives
[positives]

---

## 🖊 Wrap-up
[wrap-up]
"#,
        round = inputs.round_label,
        top_n = inputs.top_n,
        win_pattern = inputs.win_pattern,
        attack = inputs.attack_ranking,
        defense = inputs.defense_ranking,
    )
}
