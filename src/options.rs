use multi_tau::CorrelatorConfig;

use crate::error::{AppError, RangeError};

/// Parse a comma-separated list of indices and inclusive ranges, e.g. `0,2,4-7`.
///
/// Order and duplicates are preserved. An empty string yields an empty list.
pub fn parse_range_string(input: &str) -> Result<Vec<u32>, RangeError> {
    let malformed = || RangeError::Malformed(input.to_string());
    let mut values = Vec::with_capacity(8);
    if input.is_empty() {
        return Ok(values);
    }

    for item in input.split(',') {
        match item.split_once('-') {
            Some((lo, hi)) => {
                let start = parse_index(lo).ok_or_else(malformed)?;
                let end = parse_index(hi).ok_or_else(malformed)?;
                if end <= start {
                    return Err(RangeError::Descending {
                        input: input.to_string(),
                        start,
                        end,
                    });
                }
                values.extend(start..=end);
            }
            None => values.push(parse_index(item).ok_or_else(malformed)?),
        }
    }
    Ok(values)
}

fn parse_index(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Sorted, deduplicated set of 0-based file column indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet(Vec<usize>);

impl ColumnSet {
    pub fn contains(&self, column: usize) -> bool {
        self.0.binary_search(&column).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fail if any index is not a column of a table with `n_cols` columns.
    pub fn check_bounds(&self, kind: &'static str, n_cols: usize) -> Result<(), AppError> {
        match self.0.last() {
            Some(&column) if column >= n_cols => Err(AppError::ColumnOutOfRange {
                kind,
                column,
                n_cols,
            }),
            _ => Ok(()),
        }
    }
}

impl TryFrom<&str> for ColumnSet {
    type Error = RangeError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut columns: Vec<usize> = parse_range_string(s)?
            .into_iter()
            .map(|c| c as usize)
            .collect();
        columns.sort_unstable();
        columns.dedup();
        Ok(Self(columns))
    }
}

/// Parse `levels,points,averaging` into a validated-on-use correlator shape.
pub fn parse_shape(s: &str) -> Result<CorrelatorConfig, AppError> {
    match parse_range_string(s)?.as_slice() {
        &[levels, points, averaging] => Ok(CorrelatorConfig::new(
            levels as usize,
            points as usize,
            averaging as usize,
        )),
        _ => Err(AppError::InvalidShape(s.to_string())),
    }
}

pub fn parse_timestep(s: &str) -> Result<f64, String> {
    let dt: f64 = s
        .parse()
        .map_err(|_| format!("invalid timestep value '{s}'"))?;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(format!("timestep must be positive and finite, got {s}"));
    }
    Ok(dt)
}
