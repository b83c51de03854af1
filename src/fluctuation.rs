use rayon::prelude::*;

use crate::options::ColumnSet;
use crate::table::Column;

/// Subtract the arithmetic mean from `values` in place, returning the mean.
pub fn remove_mean(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    for v in values.iter_mut() {
        *v -= mean;
    }
    mean
}

/// Remove the mean of every column whose file index is in `fluct`.
///
/// Returns the number of columns touched.
pub fn remove_means(columns: &mut [Column], fluct: &ColumnSet) -> usize {
    columns
        .par_iter_mut()
        .filter(|c| fluct.contains(c.index))
        .map(|c| {
            let mean = remove_mean(&mut c.values);
            log::debug!("column {}: removed mean {mean:.8e}", c.index);
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_remove_mean() {
        let mut xs = vec![1.0, 2.0, 3.0, 6.0];
        let mean = remove_mean(&mut xs);
        assert_abs_diff_eq!(mean, 3.0);
        assert_eq!(xs, vec![-2.0, -1.0, 0.0, 3.0]);
        assert_abs_diff_eq!(xs.iter().sum::<f64>(), 0.0);

        let mut empty: Vec<f64> = vec![];
        assert_eq!(remove_mean(&mut empty), 0.0);
    }

    #[test]
    fn test_only_selected_columns() {
        let mut cols = vec![
            Column {
                index: 1,
                values: vec![1.0, 3.0],
            },
            Column {
                index: 2,
                values: vec![10.0, 20.0],
            },
            Column {
                index: 4,
                values: vec![5.0, 7.0],
            },
        ];
        let fluct = ColumnSet::try_from("2-4").unwrap();
        assert_eq!(remove_means(&mut cols, &fluct), 2);
        assert_eq!(cols[0].values, vec![1.0, 3.0]);
        assert_eq!(cols[1].values, vec![-5.0, 5.0]);
        assert_eq!(cols[2].values, vec![-1.0, 1.0]);
    }
}
