use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use match_report::config::ReportConfig;
use match_report::export;
use match_report::headers::reconstruct;
use match_report::loader;
use match_report::logging;

/// Rebuilds the merged headers of raw team-stats exports and writes each one
/// back as `<name>_arranged.csv`, optionally also as sheets of one workbook.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let input = parse_path_arg("input").context("missing --input=<csv file or directory>")?;
    let out_dir = parse_path_arg("out-dir").unwrap_or_else(|| PathBuf::from("output"));
    let workbook = parse_path_arg("xlsx");
    let cfg = ReportConfig::resolve(parse_path_arg("config").as_deref())?;

    let inputs = if input.is_dir() {
        loader::discover_inputs(&input)?
    } else {
        vec![input.clone()]
    };
    if inputs.is_empty() {
        return Err(anyhow!("no csv inputs under {}", input.display()));
    }

    let mut sheets = Vec::new();
    for path in &inputs {
        let grid = loader::load_raw_grid(path)?;
        let rebuilt = reconstruct(grid, &cfg.vocabulary)
            .with_context(|| format!("reconstruct header of {}", path.display()))?;
        for group in rebuilt.anomalies() {
            warn!(
                path = %path.display(),
                column = group.start,
                label = group.label.as_deref().unwrap_or(""),
                reason = ?group.skip,
                "header group not fully named"
            );
        }

        let out_path = out_dir.join(arranged_name(path));
        export::write_table_csv(&rebuilt.table, &out_path)?;
        info!(
            input = %path.display(),
            output = %out_path.display(),
            rows = rebuilt.table.len(),
            columns = rebuilt.table.columns().len(),
            "arranged table written"
        );

        if workbook.is_some() {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("Table{}", sheets.len() + 1));
            sheets.push((name, export::table_rows(&rebuilt.table)));
        }
    }

    if let Some(workbook) = workbook {
        export::write_workbook(&workbook, &sheets)?;
        info!(path = %workbook.display(), sheets = sheets.len(), "workbook written");
    }
    Ok(())
}

fn arranged_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    format!("{stem}_arranged.csv")
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
