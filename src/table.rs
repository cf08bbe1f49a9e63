use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

pub const TEAM_COLUMN: &str = "Team";
pub const GOALS_COLUMN: &str = "Goals";
pub const DATE_COLUMN: &str = "Date";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),
    #[error("row {row} out of range (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("raw grid is empty (no header row)")]
    EmptyGrid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if !s.is_empty() => Cell::Text(s.to_string()),
            _ => Cell::Empty,
        }
    }

    /// Numeric view of the cell. Text is parsed leniently so a value read back
    /// from an un-coerced column still compares as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Number(_) => None,
            Cell::Text(s) => parse_number(s),
            Cell::Empty => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part (`2025-05-24 00:00:00`,
/// `2025-05-24T19:00`), which is how spreadsheet exports render dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub type RawGrid = Vec<Vec<Option<String>>>;

/// Flat table with named columns. Column names are not required to be unique;
/// lookups resolve to the first column with a given name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn row(&self, idx: usize) -> Option<RowRef<'_>> {
        self.rows.get(idx).map(|cells| RowRef { table: self, cells })
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.cell(row, col)
    }

    pub fn number(&self, row: usize, column: &str) -> Option<f64> {
        self.value(row, column).and_then(Cell::as_f64)
    }

    pub fn text(&self, row: usize, column: &str) -> Option<&str> {
        self.value(row, column).and_then(Cell::as_str)
    }

    pub fn date(&self, row: usize) -> Option<NaiveDate> {
        match self.value(row, DATE_COLUMN)? {
            Cell::Text(s) => parse_date(s),
            _ => None,
        }
    }

    pub fn column_cells<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a Cell> + use<'a> {
        let col = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| col.and_then(|c| row.get(c)))
    }

    pub fn is_numeric_column(&self, col: usize) -> bool {
        self.rows
            .iter()
            .filter_map(|row| row.get(col))
            .all(|cell| matches!(cell, Cell::Number(_) | Cell::Empty))
    }

    /// Converts every column whose non-empty cells all parse as numbers.
    /// Columns with any unparseable cell are left untouched.
    pub fn coerce_numeric(&mut self) {
        for col in 0..self.columns.len() {
            let convertible = self.rows.iter().all(|row| match &row[col] {
                Cell::Text(s) => parse_number(s).is_some(),
                Cell::Number(_) | Cell::Empty => true,
            });
            if !convertible {
                continue;
            }
            for row in &mut self.rows {
                if let Cell::Text(s) = &row[col]
                    && let Some(v) = parse_number(s)
                {
                    row[col] = Cell::Number(v);
                }
            }
        }
    }

    pub fn filter_rows(&self, mut keep: impl FnMut(RowRef<'_>) -> bool) -> Table {
        let rows = (0..self.rows.len())
            .filter_map(|idx| self.row(idx))
            .filter(|row| keep(*row))
            .map(|row| row.cells.to_vec())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn filter_dates(&self, dates: &[NaiveDate]) -> Table {
        let col = self.column_index(DATE_COLUMN);
        self.filter_rows(|row| {
            col.and_then(|c| row.cells.get(c))
                .and_then(Cell::as_str)
                .and_then(parse_date)
                .is_some_and(|d| dates.contains(&d))
        })
    }

    /// Stacks tables vertically, aligning by column name. The result carries the
    /// union of columns in first-seen order; cells a table lacks stay empty.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for table in &tables {
            for name in &table.columns {
                if !positions.contains_key(name) {
                    positions.insert(name.clone(), columns.len());
                    columns.push(name.clone());
                }
            }
        }

        let width = columns.len();
        let mut rows = Vec::new();
        for table in tables {
            let mapping: Vec<usize> = table.columns.iter().map(|c| positions[c]).collect();
            let mut seen = vec![false; width];
            for row in table.rows {
                let mut out = vec![Cell::Empty; width];
                seen.iter_mut().for_each(|s| *s = false);
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    // Duplicate names inside one table: first column wins.
                    if !seen[target] {
                        seen[target] = true;
                        out[target] = cell;
                    }
                }
                rows.push(out);
            }
        }

        let mut table = Table { columns, rows };
        // A column numeric in one file and text in another is re-checked here.
        table.coerce_numeric();
        table
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    cells: &'a [Cell],
}

impl<'a> RowRef<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let col = self.table.column_index(column)?;
        self.cells.get(col)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Cell::as_f64)
    }

    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(Cell::as_str)
    }

    pub fn team(&self) -> Option<&'a str> {
        self.text(TEAM_COLUMN)
    }

    pub fn goals(&self) -> Option<f64> {
        self.number(GOALS_COLUMN)
    }
}
