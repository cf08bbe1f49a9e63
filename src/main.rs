use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use match_report::config::ReportConfig;
use match_report::export::{self, text_table_sheet};
use match_report::loader;
use match_report::logging;
use match_report::outliers::top_outliers;
use match_report::ranking::{RankingTable, ranking_table};
use match_report::report::{ReportInputs, find_match_rows, render_report};
use match_report::table::Table;
use match_report::win_pattern::win_pattern;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let config_path = parse_path_arg("config");
    let mut cfg = ReportConfig::resolve(config_path.as_deref())?;
    if let Some(out) = parse_path_arg("out") {
        cfg.output_path = out;
    }

    generate_report(&cfg)
}

fn generate_report(cfg: &ReportConfig) -> Result<()> {
    let history = loader::load_arranged_csv(&cfg.history_csv)?;
    info!(
        path = %cfg.history_csv.display(),
        rows = history.len(),
        "loaded match history"
    );

    let Some(rows) = find_match_rows(&history, &cfg.team_name, cfg.match_date)? else {
        warn!(
            team = %cfg.team_name,
            date = %cfg.match_date,
            "no match found for the requested date"
        );
        return Ok(());
    };
    let team_row = history.row(rows.team).context("team row vanished")?;
    let opponent_row = history.row(rows.opponent).context("opponent row vanished")?;

    let outliers = top_outliers(
        &history,
        &cfg.analysis_columns,
        rows.team,
        cfg.top_n,
        cfg.z_threshold,
    );
    let wins = win_pattern(
        &history,
        &cfg.team_name,
        team_row,
        &cfg.key_comparison_metrics,
        &cfg.win_orientation,
    )?;

    let round = load_round(&cfg.input_dir, cfg)?;
    let attack = ranking_table(&round, &cfg.comparison_dates, &cfg.attack_metrics)?;
    let defense = ranking_table(&round, &cfg.comparison_dates, &cfg.defense_metrics)?;

    let win_markdown = wins.to_markdown();
    let attack_markdown = attack.to_markdown();
    let defense_markdown = defense.to_markdown();
    let report = render_report(&ReportInputs {
        team_row,
        opponent_row,
        match_date: cfg.match_date,
        round_label: &cfg.round_label,
        key_metrics: &cfg.key_stat_metrics,
        key_orientation: &cfg.key_stat_orientation,
        outliers: &outliers,
        top_n: cfg.top_n,
        win_pattern: &win_markdown,
        attack_ranking: &attack_markdown,
        defense_ranking: &defense_markdown,
    });

    write_report(&cfg.output_path, &report)?;
    info!(path = %cfg.output_path.display(), "markdown report written");

    if let Some(workbook) = cfg.workbook_path.as_deref() {
        write_rankings_workbook(workbook, &round, &attack, &defense)?;
        info!(path = %workbook.display(), "ranking workbook written");
    }
    Ok(())
}

fn load_round(dir: &Path, cfg: &ReportConfig) -> Result<Table> {
    let paths = loader::discover_inputs(dir)?;
    if paths.is_empty() {
        warn!(dir = %dir.display(), "no round exports found; rankings will be empty");
        return Ok(Table::default());
    }
    loader::assemble_tables(&paths, &cfg.vocabulary)
}

fn write_report(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("write report {}", path.display()))
}

fn write_rankings_workbook(
    path: &Path,
    round: &Table,
    attack: &RankingTable,
    defense: &RankingTable,
) -> Result<()> {
    let sheets = vec![
        text_table_sheet("Attack", &attack.to_text_table()),
        text_table_sheet("Defense", &defense.to_text_table()),
        ("Round".to_string(), export::table_rows(round)),
    ];
    export::write_workbook(path, &sheets)
}

fn parse_path_arg(name: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("--{name}=");
    let flag = format!("--{name}");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
