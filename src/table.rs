use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::options::ColumnSet;

/// One retained input column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// 0-based position in the input file.
    pub index: usize,
    pub values: Vec<f64>,
}

impl AsRef<[f64]> for Column {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Column-major numeric table.
#[derive(Debug)]
pub struct Table {
    pub columns: Vec<Vec<f64>>,
}

impl Table {
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Keep every column not listed in `skip`.
    pub fn select(self, skip: &ColumnSet) -> Result<Vec<Column>, AppError> {
        skip.check_bounds("skip", self.n_cols())?;
        let kept: Vec<Column> = self
            .columns
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !skip.contains(*index))
            .map(|(index, values)| Column { index, values })
            .collect();
        if kept.is_empty() {
            return Err(AppError::AllColumnsSkipped);
        }
        Ok(kept)
    }
}

pub fn read_table(path: &Path) -> Result<Table, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(path, e))?;
    parse_table(BufReader::new(file), path)
}

/// Parse whitespace-delimited rows. Blank lines and `#` comments are skipped;
/// the first data row fixes the column count.
pub fn parse_table(reader: impl BufRead, path: &Path) -> Result<Table, AppError> {
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AppError::io(path, e))?;
        let line_no = line_idx + 1;

        let mut tokens = line.split_whitespace().peekable();
        match tokens.peek() {
            None => continue,
            Some(first) if first.starts_with('#') => continue,
            _ => {}
        }

        let row: Vec<&str> = tokens.collect();
        if columns.is_empty() {
            columns = (0..row.len()).map(|_| Vec::with_capacity(1 << 12)).collect();
        } else if row.len() != columns.len() {
            return Err(AppError::RaggedRow {
                path: PathBuf::from(path),
                line: line_no,
                expected: columns.len(),
                found: row.len(),
            });
        }

        for (column, (token, values)) in row.iter().zip(columns.iter_mut()).enumerate() {
            let value = token.parse::<f64>().map_err(|_| AppError::Parse {
                path: PathBuf::from(path),
                line: line_no,
                column,
                token: token.to_string(),
            })?;
            values.push(value);
        }
    }

    if columns.is_empty() {
        return Err(AppError::NoData(PathBuf::from(path)));
    }
    Ok(Table { columns })
}
