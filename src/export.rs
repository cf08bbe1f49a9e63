use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::markdown::TextTable;
use crate::table::{Cell, Table};

pub fn write_table_csv(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create csv {}", path.display()))?;
    writer
        .write_record(table.columns())
        .context("write csv header")?;
    for (idx, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(Cell::to_string))
            .with_context(|| format!("write csv row {idx}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush csv {}", path.display()))?;
    Ok(())
}

pub fn table_rows(table: &Table) -> Vec<Vec<String>> {
    let mut rows = vec![table.columns().to_vec()];
    rows.extend(
        table
            .rows()
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect()),
    );
    rows
}

pub fn write_workbook(path: &Path, sheets: &[(String, Vec<Vec<String>>)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(sheet_name(name))
            .with_context(|| format!("name worksheet {name}"))?;
        write_rows(sheet, rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

pub fn text_table_sheet(name: &str, table: &TextTable) -> (String, Vec<Vec<String>>) {
    (name.to_string(), table.to_rows())
}

/// Worksheet names are capped at 31 chars and may not contain `[]:*?/\`.
fn sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
