use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::headers::{HeaderVocabulary, reconstruct};
use crate::table::{Cell, RawGrid, Table};

pub fn load_raw_grid(path: &Path) -> Result<RawGrid> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open input table {}", path.display()))?;
    read_raw_grid(file).with_context(|| format!("parse csv {}", path.display()))
}

pub fn read_raw_grid<R: Read>(rdr: R) -> Result<RawGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);

    let mut grid: RawGrid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut grid {
        row.resize(width, None);
    }
    Ok(grid)
}

pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir_str = dir
        .to_str()
        .with_context(|| format!("non-utf8 input dir {}", dir.display()))?;
    // The directory is literal; only the file part is a pattern.
    let escaped = glob::Pattern::escape(dir_str);
    let pattern = Path::new(&escaped).join("*.csv");
    let pattern = pattern.to_string_lossy();
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern).context("invalid input glob")? {
        match entry {
            Ok(path) => paths.push(path),
            Err(err) => warn!(error = %err, "skipping unreadable input entry"),
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn assemble_tables(paths: &[PathBuf], vocab: &HeaderVocabulary) -> Result<Table> {
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let grid = load_raw_grid(path)?;
        let rebuilt = reconstruct(grid, vocab)
            .with_context(|| format!("reconstruct header of {}", path.display()))?;
        let anomalies = rebuilt.anomalies().count();
        info!(
            path = %path.display(),
            rows = rebuilt.table.len(),
            columns = rebuilt.table.columns().len(),
            anomalies,
            "loaded input table"
        );
        tables.push(rebuilt.table);
    }
    Ok(Table::concat(tables))
}

/// Loads a table whose first row already holds flat column names, e.g. the
/// output of `arrange_headers`.
pub fn load_arranged_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open arranged table {}", path.display()))?;
    read_arranged_csv(file).with_context(|| format!("parse csv {}", path.display()))
}

pub fn read_arranged_csv<R: Read>(rdr: R) -> Result<Table> {
    let mut grid = read_raw_grid(rdr)?.into_iter();
    let Some(header) = grid.next() else {
        return Ok(Table::default());
    };
    let columns: Vec<String> = header.into_iter().map(Option::unwrap_or_default).collect();
    let rows = grid
        .map(|row| row.iter().map(|c| Cell::from_raw(c.as_deref())).collect())
        .collect();
    let mut table = Table::new(columns, rows);
    table.coerce_numeric();
    Ok(table)
}
