use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::NaiveDate;
use match_report::headers::{HeaderVocabulary, reconstruct};
use match_report::loader::read_raw_grid;
use match_report::outliers::top_outliers;
use match_report::ranking::ranking_table;
use match_report::table::{Cell, RawGrid, Table};

fn synthetic_round(matches: usize) -> RawGrid {
    let mut grid = read_raw_grid(ROUND_CSV.as_bytes()).expect("valid fixture csv");
    let template = grid[1].clone();
    grid.truncate(1);
    for idx in 0..matches * 2 {
        let mut row = template.clone();
        row[2] = Some(format!("Team {idx}"));
        row[5] = Some(format!("{:.2}", 0.4 + (idx % 17) as f64 * 0.13));
        row[19] = Some(format!("{:.1}", 7.5 + (idx % 11) as f64 * 0.6));
        grid.push(row);
    }
    grid
}

fn synthetic_history(rows: usize, columns: usize) -> (Table, Vec<String>) {
    let names: Vec<String> = (0..columns).map(|c| format!("metric {c}")).collect();
    let data = (0..rows)
        .map(|r| {
            (0..columns)
                .map(|c| Cell::Number(((r * 31 + c * 7) % 23) as f64 * 0.5))
                .collect()
        })
        .collect();
    (Table::new(names.clone(), data), names)
}

fn bench_header_reconstruct(c: &mut Criterion) {
    let grid = synthetic_round(200);
    let vocab = HeaderVocabulary::default();
    c.bench_function("header_reconstruct", |b| {
        b.iter(|| {
            let rebuilt = reconstruct(black_box(grid.clone()), &vocab).unwrap();
            black_box(rebuilt.table.len());
        })
    });
}

fn bench_top_outliers(c: &mut Criterion) {
    let (table, columns) = synthetic_history(80, 100);
    c.bench_function("top_outliers", |b| {
        b.iter(|| {
            let hits = top_outliers(black_box(&table), &columns, 40, 5, 1.5);
            black_box(hits.len());
        })
    });
}

fn bench_ranking_table(c: &mut Criterion) {
    let table = reconstruct(synthetic_round(200), &HeaderVocabulary::default())
        .unwrap()
        .table;
    let dates = [NaiveDate::from_ymd_opt(2025, 5, 24).unwrap()];
    let metrics: Vec<String> = ["xG", "Shots on target", "PPDA", "Match tempo"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    c.bench_function("ranking_table", |b| {
        b.iter(|| {
            let ranking = ranking_table(black_box(&table), &dates, &metrics).unwrap();
            black_box(ranking.index.len());
        })
    });
}

criterion_group!(
    perf,
    bench_header_reconstruct,
    bench_top_outliers,
    bench_ranking_table
);
criterion_main!(perf);

static ROUND_CSV: &str = include_str!("../tests/fixtures/round_2025-05-24.csv");
