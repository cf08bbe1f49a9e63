use std::path::PathBuf;

use match_report::headers::{
    ExpansionRule, HeaderVocabulary, SkipReason, expand_header, reconstruct,
};
use match_report::loader::load_raw_grid;
use match_report::table::{Cell, RawGrid};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn grid(header: &[&str], rows: &[&[&str]]) -> RawGrid {
    let to_row = |cells: &[&str]| {
        cells
            .iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect::<Vec<_>>()
    };
    let mut out = vec![to_row(header)];
    out.extend(rows.iter().map(|r| to_row(*r)));
    out
}

fn column_names(header: &[&str]) -> Vec<String> {
    let rebuilt = reconstruct(grid(header, &[]), &HeaderVocabulary::default())
        .expect("header row present");
    rebuilt.table.columns().to_vec()
}

#[test]
fn count_suffix_group_expands_to_total_and_percentage() {
    assert_eq!(
        column_names(&["Shots / on target", "", "", "Passes"]),
        vec!["Shots", "Shots on target", "Shots on target%", "Passes"]
    );
}

#[test]
fn tiered_group_expands_each_zone() {
    assert_eq!(
        column_names(&["Losses / Low / Medium / High", "", "", ""]),
        vec!["Losses", "Losses Low", "Losses Medium", "Losses High"]
    );
}

#[test]
fn penalty_entries_use_fixed_names() {
    let groups = expand_header(
        &[
            Some("Penalty area entries (runs / crosses".to_string()),
            None,
            None,
        ],
        &HeaderVocabulary::default(),
    );
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].rule, Some(ExpansionRule::PenaltyEntries));
    assert_eq!(groups[0].consumed, 3);
    assert_eq!(
        groups[0].emitted[1..],
        ["Penalty area entries runs", "Penalty area entries crosses"]
    );
    // The label's own leading part still names the first raw column.
    assert_eq!(groups[0].emitted[0], "Penalty area entries (runs");
}

#[test]
fn suffix_group_width_follows_blank_count() {
    let vocab = HeaderVocabulary::default();
    for suffix in &vocab.count_suffixes {
        for blanks in 0..=2usize {
            let mut header = vec![Some(format!("Metric / {suffix}"))];
            header.extend(std::iter::repeat_n(None, blanks));
            let groups = expand_header(&header, &vocab);
            assert_eq!(groups.len(), 1);
            assert_eq!(
                groups[0].emitted.len(),
                blanks.min(2) + 1,
                "suffix {suffix:?} with {blanks} blanks"
            );
            assert!(groups[0].skip.is_none());
        }
    }
}

#[test]
fn emitted_never_exceeds_consumed() {
    let header: Vec<Option<String>> = [
        "Team", "", "Shots / on target", "", "", "", "Losses / Low / Medium / High", "", "",
        "A / b / c / d / e", "", "Duels / won", "nan",
    ]
    .iter()
    .map(|s| Some(s.to_string()))
    .collect();
    let groups = expand_header(&header, &HeaderVocabulary::default());
    let consumed: usize = groups.iter().map(|g| g.consumed).sum();
    assert_eq!(consumed, header.len());
    for g in &groups {
        assert!(g.emitted.len() <= g.consumed, "{g:?}");
        assert_eq!(g.skip.is_some(), g.emitted.len() < g.consumed, "{g:?}");
    }
}

#[test]
fn malformed_group_shifts_later_columns_left() {
    // Tiered label with only two blanks: just "Losses" is named, so "PPDA"
    // lands on the first blank column and the last raw column is dropped.
    let rebuilt = reconstruct(
        grid(
            &["Losses / Low / Medium / High", "", "", "PPDA"],
            &[&["90", "30", "40", "9.5"]],
        ),
        &HeaderVocabulary::default(),
    )
    .unwrap();
    assert_eq!(rebuilt.table.columns(), &["Losses", "PPDA"]);
    assert_eq!(rebuilt.table.number(0, "PPDA"), Some(30.0));
    let anomaly = rebuilt.anomalies().next().expect("one anomaly");
    assert_eq!(
        anomaly.skip,
        Some(SkipReason::BlankCountMismatch {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn orphan_blank_column_is_dropped() {
    let rebuilt = reconstruct(
        grid(&["", "Team", "Goals"], &[&["x", "Kashima Antlers", "2"]]),
        &HeaderVocabulary::default(),
    )
    .unwrap();
    assert_eq!(rebuilt.table.columns(), &["Team", "Goals"]);
    assert_eq!(rebuilt.table.text(0, "Team"), Some("x"));
}

#[test]
fn plain_labels_survive_verbatim() {
    assert_eq!(
        column_names(&["Date", "Team", "Goals", "Possession, %"]),
        vec!["Date", "Team", "Goals", "Possession, %"]
    );
}

#[test]
fn custom_vocabulary_changes_expansion() {
    let vocab = HeaderVocabulary {
        count_suffixes: vec!["completed".to_string()],
        ..HeaderVocabulary::default()
    };
    let groups = expand_header(
        &[Some("Passes / completed".to_string()), None, None],
        &vocab,
    );
    assert_eq!(groups[0].rule, Some(ExpansionRule::CountSuffix));
    assert_eq!(
        groups[0].emitted,
        vec!["Passes", "Passes completed", "Passes completed%"]
    );
}

#[test]
fn numeric_coercion_is_idempotent() {
    let rebuilt = reconstruct(
        grid(
            &["Team", "Goals", "xG"],
            &[&["Kashima Antlers", "2", "1.85"], &["Urawa Reds", "1", ""]],
        ),
        &HeaderVocabulary::default(),
    )
    .unwrap();
    let once = rebuilt.table.clone();
    let mut twice = rebuilt.table;
    twice.coerce_numeric();
    assert_eq!(once, twice);
    assert_eq!(twice.value(0, "Goals"), Some(&Cell::Number(2.0)));
    assert_eq!(twice.value(1, "xG"), Some(&Cell::Empty));
    assert_eq!(twice.value(0, "Team"), Some(&Cell::Text("Kashima Antlers".to_string())));
}

#[test]
fn reconstructs_round_export_fixture() {
    let grid = load_raw_grid(&fixture("round_2025-05-24.csv")).expect("fixture should load");
    let rebuilt = reconstruct(grid, &HeaderVocabulary::default()).unwrap();
    assert_eq!(rebuilt.anomalies().count(), 0);
    let table = rebuilt.table;
    assert_eq!(
        table.columns(),
        &[
            "Date",
            "Match",
            "Team",
            "Scheme",
            "Goals",
            "xG",
            "Shots",
            "Shots on target",
            "Shots on target%",
            "Passes",
            "Passes accurate",
            "Passes accurate%",
            "Losses",
            "Losses Low",
            "Losses Medium",
            "Losses High",
            "Penalty area entries (runs",
            "Penalty area entries runs",
            "Penalty area entries crosses",
            "PPDA",
            "Match tempo",
            "Duels",
            "Duels won",
            "Duels won%",
        ]
    );
    assert_eq!(table.len(), 4);
    assert_eq!(table.text(0, "Team"), Some("Kashima Antlers"));
    assert_eq!(table.text(2, "Scheme"), Some("4-3-3"));
    assert_eq!(table.value(1, "Shots on target%"), Some(&Cell::Number(37.5)));
    assert_eq!(table.number(3, "Duels won%"), Some(51.58));
    assert!(table.date(0).is_some());
}

#[test]
fn empty_grid_is_an_error() {
    assert!(reconstruct(Vec::new(), &HeaderVocabulary::default()).is_err());
}
