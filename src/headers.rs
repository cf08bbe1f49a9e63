use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::{Cell, RawGrid, Table, TableError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderVocabulary {
    /// Second parts of a two-part label that expand into `{main} {suffix}` and
    /// `{main} {suffix}%`.
    pub count_suffixes: Vec<String>,
    /// Ordered tiers of a zone-split label, e.g. `Losses / Low / Medium / High`.
    pub tiers: Vec<String>,
    pub penalty_entries: PenaltyEntriesRule,
}

/// The penalty-area-entries group names its sub-columns with fixed literals
/// instead of deriving them from the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyEntriesRule {
    pub main_marker: String,
    pub sub_marker: String,
    pub columns: Vec<String>,
}

impl Default for HeaderVocabulary {
    fn default() -> Self {
        Self {
            count_suffixes: [
                "on target",
                "accurate",
                "won",
                "with shots",
                "converted",
                "successful",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            tiers: ["Low", "Medium", "High"].iter().map(|s| s.to_string()).collect(),
            penalty_entries: PenaltyEntriesRule::default(),
        }
    }
}

impl Default for PenaltyEntriesRule {
    fn default() -> Self {
        Self {
            main_marker: "runs".to_string(),
            sub_marker: "crosses".to_string(),
            columns: vec![
                "Penalty area entries runs".to_string(),
                "Penalty area entries crosses".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionRule {
    Plain,
    CountSuffix,
    Tiered,
    PenaltyEntries,
    Fallback,
}

/// Why a raw column did not get its own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Blank header cell not consumed by a preceding group.
    OrphanBlank,
    /// The group's blank run did not have the width its rule expects, so only
    /// part of it (usually just the main label) was named.
    BlankCountMismatch { expected: usize, found: usize },
    /// Fallback group with more blanks than sub-labels to name them.
    TooFewSubLabels { sub_labels: usize, blanks: usize },
}

/// Result of expanding one header position. `consumed` raw columns produced
/// `emitted` names; a `skip` is present whenever `emitted.len() < consumed`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutcome {
    pub start: usize,
    pub label: Option<String>,
    pub rule: Option<ExpansionRule>,
    pub consumed: usize,
    pub emitted: Vec<String>,
    pub skip: Option<SkipReason>,
}

#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub table: Table,
    pub groups: Vec<GroupOutcome>,
}

impl Reconstruction {
    pub fn anomalies(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.groups.iter().filter(|g| g.skip.is_some())
    }
}

/// A header cell counts as blank when it is absent, empty or the literal `nan`
/// that spreadsheet round trips leave behind.
pub fn is_blank(token: Option<&str>) -> bool {
    match token {
        None => true,
        Some(s) => s.is_empty() || s == "nan",
    }
}

/// Expands a raw header row into canonical column names, one outcome per group.
pub fn expand_header(header: &[Option<String>], vocab: &HeaderVocabulary) -> Vec<GroupOutcome> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < header.len() {
        let token = header[i].as_deref();
        let Some(label) = token.filter(|t| !is_blank(Some(*t))) else {
            out.push(GroupOutcome {
                start: i,
                label: None,
                rule: None,
                consumed: 1,
                emitted: Vec::new(),
                skip: Some(SkipReason::OrphanBlank),
            });
            i += 1;
            continue;
        };

        if !label.contains('/') {
            out.push(GroupOutcome {
                start: i,
                label: Some(label.to_string()),
                rule: Some(ExpansionRule::Plain),
                consumed: 1,
                emitted: vec![label.to_string()],
                skip: None,
            });
            i += 1;
            continue;
        }

        let parts: Vec<&str> = label.split('/').map(str::trim).collect();
        let blanks = header[i + 1..]
            .iter()
            .take_while(|t| is_blank(t.as_deref()))
            .count();
        let (rule, emitted, skip) = expand_group(&parts, blanks, vocab);
        out.push(GroupOutcome {
            start: i,
            label: Some(label.to_string()),
            rule: Some(rule),
            consumed: blanks + 1,
            emitted,
            skip,
        });
        i += blanks + 1;
    }
    out
}

fn expand_group(
    parts: &[&str],
    blanks: usize,
    vocab: &HeaderVocabulary,
) -> (ExpansionRule, Vec<String>, Option<SkipReason>) {
    let main = parts[0];
    let mut names = vec![main.to_string()];

    if parts.len() == 2 && vocab.count_suffixes.iter().any(|s| s == parts[1]) {
        let suffix = parts[1];
        match blanks {
            2 => {
                names.push(format!("{main} {suffix}"));
                names.push(format!("{main} {suffix}%"));
            }
            1 => names.push(format!("{main} {suffix}")),
            _ => {}
        }
        let skip = mismatch(&names, blanks, 2);
        return (ExpansionRule::CountSuffix, names, skip);
    }

    if parts.len() == vocab.tiers.len() + 1
        && !vocab.tiers.is_empty()
        && parts[1..].iter().zip(&vocab.tiers).all(|(p, t)| *p == t.as_str())
    {
        if blanks == vocab.tiers.len() {
            names.extend(vocab.tiers.iter().map(|t| format!("{main} {t}")));
        }
        let skip = mismatch(&names, blanks, vocab.tiers.len());
        return (ExpansionRule::Tiered, names, skip);
    }

    let penalty = &vocab.penalty_entries;
    if parts[1].contains(penalty.sub_marker.as_str()) && main.contains(penalty.main_marker.as_str()) {
        if blanks == penalty.columns.len() {
            names.extend(penalty.columns.iter().cloned());
        }
        let skip = mismatch(&names, blanks, penalty.columns.len());
        return (ExpansionRule::PenaltyEntries, names, skip);
    }

    names.extend(
        parts
            .iter()
            .enumerate()
            .skip(1)
            .take_while(|(k, _)| *k <= blanks)
            .map(|(_, sub)| format!("{main} {sub}")),
    );
    let skip = (names.len() < blanks + 1).then_some(SkipReason::TooFewSubLabels {
        sub_labels: parts.len() - 1,
        blanks,
    });
    (ExpansionRule::Fallback, names, skip)
}

fn mismatch(names: &[String], blanks: usize, expected: usize) -> Option<SkipReason> {
    (names.len() < blanks + 1).then_some(SkipReason::BlankCountMismatch {
        expected,
        found: blanks,
    })
}

/// Replaces the raw header row of `grid` with reconstructed names and returns
/// the data rows as a table, numeric columns coerced.
///
/// Names are assigned to raw columns left to right. A group that names fewer
/// columns than it spans shifts every later name one or more columns to the
/// left; raw columns past the last name are dropped.
pub fn reconstruct(grid: RawGrid, vocab: &HeaderVocabulary) -> Result<Reconstruction, TableError> {
    let mut rows = grid.into_iter();
    let header = rows.next().ok_or(TableError::EmptyGrid)?;
    let groups = expand_header(&header, vocab);

    for group in groups.iter().filter(|g| g.skip.is_some()) {
        debug!(
            start = group.start,
            label = group.label.as_deref().unwrap_or(""),
            consumed = group.consumed,
            emitted = group.emitted.len(),
            reason = ?group.skip,
            "header group yielded fewer columns than it spans"
        );
    }

    let columns: Vec<String> = groups.iter().flat_map(|g| g.emitted.iter().cloned()).collect();
    let width = columns.len();
    let data = rows
        .map(|raw| {
            let mut cells: Vec<Cell> = raw
                .iter()
                .take(width)
                .map(|c| Cell::from_raw(c.as_deref()))
                .collect();
            cells.resize(width, Cell::Empty);
            cells
        })
        .collect();

    let mut table = Table::new(columns, data);
    table.coerce_numeric();
    Ok(Reconstruction { table, groups })
}
