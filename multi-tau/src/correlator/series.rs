/// Evaluated autocorrelation: parallel sequences of lag labels and estimates.
///
/// Lags are in units of the raw sampling interval and strictly increasing.
/// The length depends on how much data reached each level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correlation {
    lags: Vec<u64>,
    values: Vec<f64>,
}

impl Correlation {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            lags: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, lag: u64, value: f64) {
        debug_assert!(self.lags.last().map_or(true, |&prev| prev < lag));
        self.lags.push(lag);
        self.values.push(value);
    }

    pub fn lags(&self) -> &[u64] {
        &self.lags
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    /// `(lag, value)` pairs in increasing lag order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.lags.iter().copied().zip(self.values.iter().copied())
    }

    /// Lag labels scaled to physical time by the sampling interval `timestep`.
    pub fn time_lags(&self, timestep: f64) -> Vec<f64> {
        self.lags.iter().map(|&lag| lag as f64 * timestep).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_lags_scale_labels() {
        let mut c = Correlation::with_capacity(3);
        c.push(0, 4.0);
        c.push(3, 2.0);
        c.push(16, 1.0);

        assert_eq!(c.len(), 3);
        assert_eq!(c.time_lags(0.5), vec![0.0, 1.5, 8.0]);
        assert_eq!(c.time_lags(1.0), vec![0.0, 3.0, 16.0]);
        let pairs: Vec<(u64, f64)> = c.iter().collect();
        assert_eq!(pairs, vec![(0, 4.0), (3, 2.0), (16, 1.0)]);
    }

    #[test]
    fn test_empty() {
        let c = Correlation::default();
        assert!(c.is_empty());
        assert!(c.time_lags(2.0).is_empty());
    }
}
