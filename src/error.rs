use std::path::PathBuf;

use multi_tau::CorrelatorError;
use thiserror::Error;

pub const FILE_ERROR: u8 = 1;
pub const COMMAND_LINE_ERROR: u8 = 2;
pub const RANGE_STRING_ERROR: u8 = 3;

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("invalid range string '{0}'")]
    Malformed(String),
    #[error("invalid range string '{input}': {end} is not greater than {start}")]
    Descending { input: String, start: u32, end: u32 },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: column {column}: cannot parse '{token}' as a number", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        token: String,
    },
    #[error("{}:{line}: expected {expected} fields, found {found}", .path.display())]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{}: no data columns found", .0.display())]
    NoData(PathBuf),
    #[error("{kind} column {column} is out of range, the file has {n_cols} columns")]
    ColumnOutOfRange {
        kind: &'static str,
        column: usize,
        n_cols: usize,
    },
    #[error("invalid correlator options '{0}', expected three values: levels,points,averaging")]
    InvalidShape(String),
    #[error("every column is skipped, nothing to correlate")]
    AllColumnsSkipped,
    #[error("column {column} produced {found} lags, expected {expected}")]
    LagAxisMismatch {
        column: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Correlator(#[from] CorrelatorError),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Range(_) => RANGE_STRING_ERROR,
            Self::Correlator(_)
            | Self::InvalidShape(_)
            | Self::ColumnOutOfRange { .. }
            | Self::AllColumnsSkipped => COMMAND_LINE_ERROR,
            _ => FILE_ERROR,
        }
    }
}
