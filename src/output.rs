use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use multi_tau::Correlation;

use crate::error::AppError;

const PRECISION: usize = 8;
const FIELD_WIDTH: usize = 15;

/// C-style scientific notation: `1.50000000e-03`.
pub fn scientific(x: f64) -> String {
    let s = format!("{x:.PRECISION$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => s,
        },
        None => s,
    }
}

/// All columns must share the first column's lag axis.
fn check_lag_axis(results: &[Correlation]) -> Result<(), AppError> {
    let Some(first) = results.first() else {
        return Ok(());
    };
    for (column, r) in results.iter().enumerate().skip(1) {
        if r.lags() != first.lags() {
            return Err(AppError::LagAxisMismatch {
                column,
                expected: first.len(),
                found: r.len(),
            });
        }
    }
    Ok(())
}

/// Write one row per lag: the physical time lag, then every column's value.
pub fn write_rows<W: Write>(
    out: &mut W,
    timestep: f64,
    results: &[Correlation],
) -> std::io::Result<()> {
    let Some(first) = results.first() else {
        return Ok(());
    };
    for (row, time) in first.time_lags(timestep).into_iter().enumerate() {
        write!(out, "{}", scientific(time))?;
        for r in results {
            write!(out, " {:>FIELD_WIDTH$}", scientific(r.values()[row]))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_correlations(
    path: &Path,
    timestep: f64,
    results: &[Correlation],
) -> Result<(), AppError> {
    check_lag_axis(results)?;
    let file = File::create(path).map_err(|e| AppError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_rows(&mut out, timestep, results).map_err(|e| AppError::io(path, e))?;
    out.flush().map_err(|e| AppError::io(path, e))
}
