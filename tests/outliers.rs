use match_report::outliers::{Direction, ZSkip, top_outliers, zscore_at, zscores_for_row};
use match_report::table::{Cell, Table};

fn numeric_table(columns: &[(&str, Vec<f64>)]) -> Table {
    let len = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    let rows = (0..len)
        .map(|r| columns.iter().map(|(_, v)| Cell::Number(v[r])).collect())
        .collect();
    Table::new(columns.iter().map(|(n, _)| n.to_string()).collect(), rows)
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn single_spike_is_flagged_high() {
    let mut xg = vec![1.0; 9];
    xg.push(100.0);
    let table = numeric_table(&[("xG", xg)]);

    let hits = top_outliers(&table, &names(&["xG"]), 9, 5, 1.5);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].metric, "xG");
    assert!((hits[0].z_score - 3.0).abs() < 1e-9);
    assert_eq!(hits[0].direction, Direction::High);

    // The ordinary rows sit a third of a deviation below the mean.
    assert!(top_outliers(&table, &names(&["xG"]), 0, 5, 1.5).is_empty());
    let z = zscore_at(&table, "xG", 0).unwrap();
    assert!((z + 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn constant_column_is_skipped() {
    let table = numeric_table(&[("PPDA", vec![9.0, 9.0, 9.0, 9.0])]);
    assert_eq!(zscore_at(&table, "PPDA", 0), Err(ZSkip::ZeroVariance));
    assert!(top_outliers(&table, &names(&["PPDA"]), 0, 5, 0.0).is_empty());
}

#[test]
fn gaps_and_text_skip_the_column() {
    let table = Table::new(
        names(&["xG", "Scheme"]),
        vec![
            vec![Cell::Number(1.0), Cell::Text("4-4-2".into())],
            vec![Cell::Empty, Cell::Text("4-3-3".into())],
            vec![Cell::Number(5.0), Cell::Text("3-5-2".into())],
        ],
    );
    assert_eq!(zscore_at(&table, "xG", 2), Err(ZSkip::NonNumeric));
    assert_eq!(zscore_at(&table, "Scheme", 2), Err(ZSkip::NonNumeric));
    assert_eq!(zscore_at(&table, "Goals", 2), Err(ZSkip::MissingColumn));
    assert_eq!(zscore_at(&table, "xG", 3), Err(ZSkip::RowOutOfRange));
}

#[test]
fn single_row_has_no_distribution() {
    let table = numeric_table(&[("xG", vec![1.2])]);
    assert_eq!(zscore_at(&table, "xG", 0), Err(ZSkip::TooFewRows));
}

#[test]
fn results_sorted_by_magnitude_and_truncated() {
    // Row 0 is the outlier in every column, with different strengths.
    let table = numeric_table(&[
        ("a", vec![4.0, 0.0, 0.0, 0.0]),
        ("b", vec![-4.0, 0.0, 0.0, 0.0]),
        ("c", vec![4.0, 0.0, 0.0, 0.0]),
        ("d", vec![1.0, 0.0, 1.0, 0.0]),
    ]);
    let cols = names(&["a", "b", "c", "d"]);

    let all = top_outliers(&table, &cols, 0, 10, 1.0);
    let order: Vec<&str> = all.iter().map(|o| o.metric.as_str()).collect();
    // a, b and c share |z| = sqrt(3); ties keep column order. d has |z| = 1.
    assert_eq!(order, vec!["a", "b", "c", "d"]);
    assert_eq!(all[1].direction, Direction::Low);
    assert!((all[0].z_score - 3f64.sqrt()).abs() < 1e-9);

    let top_two = top_outliers(&table, &cols, 0, 2, 1.0);
    assert_eq!(top_two.len(), 2);
    assert_eq!(top_two[0].metric, "a");
    assert_eq!(top_two[1].metric, "b");

    let strict = top_outliers(&table, &cols, 0, 10, 1.5);
    assert_eq!(strict.len(), 3);
    assert!(strict.iter().all(|o| o.z_score.abs() >= 1.5));
}

#[test]
fn per_row_scores_follow_requested_order() {
    let table = numeric_table(&[("xG", vec![1.0, 2.0, 3.0]), ("PPDA", vec![9.0, 9.0, 9.0])]);
    let scores = zscores_for_row(&table, &names(&["PPDA", "xG", "Shots"]), 2);
    let order: Vec<&str> = scores.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(order, vec!["PPDA", "xG", "Shots"]);
    assert_eq!(scores[0].1, Err(ZSkip::ZeroVariance));
    assert!(scores[1].1.is_ok());
    assert_eq!(scores[2].1, Err(ZSkip::MissingColumn));
}
