use rayon::prelude::*;
use validator::Validate;

use crate::config::CorrelatorConfig;
use crate::correlator::{Correlation, Correlator};
use crate::error::CorrelatorError;

/// Feed each column into its own [`Correlator`], optionally in parallel.
///
/// Columns share no state, so each one is a separate rayon task. When
/// `sequential` is true, columns are processed on the current thread (no
/// rayon overhead, best when the caller already saturates all cores).
///
/// `on_column` is called once per finished column (useful for progress bars).
pub fn correlate_columns<C>(
    columns: &[C],
    config: &CorrelatorConfig,
    sequential: bool,
    on_column: &(dyn Fn() + Sync),
) -> Result<Vec<Correlator>, CorrelatorError>
where
    C: AsRef<[f64]> + Sync,
{
    config.validate()?;
    log::debug!(
        "correlating {} columns ({})",
        columns.len(),
        if sequential { "sequential" } else { "parallel" }
    );

    let work = |column: &C| -> Result<Correlator, CorrelatorError> {
        let mut corr = Correlator::new(*config)?;
        for &x in column.as_ref() {
            corr.add(x);
        }
        on_column();
        Ok(corr)
    };

    if sequential {
        columns.iter().map(work).collect()
    } else {
        columns.par_iter().map(work).collect()
    }
}

/// Evaluate every correlator, optionally in parallel.
pub fn evaluate_all(correlators: &[Correlator], normalize: bool, sequential: bool) -> Vec<Correlation> {
    if sequential {
        correlators.iter().map(|c| c.evaluate(normalize)).collect()
    } else {
        correlators.par_iter().map(|c| c.evaluate(normalize)).collect()
    }
}
