pub mod series;

pub use series::Correlation;

use crate::config::CorrelatorConfig;
use crate::error::CorrelatorError;
use validator::Validate;

/// Streaming multi-tau autocorrelator.
///
/// Estimates ⟨A(t)·A(t+τ)⟩ at exponentially spaced lags with a cascade of
/// fixed-size ring buffers. Level 0 sees raw samples; level `k+1` sees the
/// mean of every `m` consecutive values arriving at level `k`. Memory is
/// O(num_levels × points_per_level) regardless of stream length.
///
/// All per-level state lives in flat vectors indexed `level * p + slot`.
#[derive(Debug, Clone)]
pub struct Correlator {
    config: CorrelatorConfig,
    /// `points_per_level`.
    p: usize,
    /// `min_samples_to_average`.
    m: usize,
    min_lag: usize,
    /// Recent values per level, shape [num_levels][p].
    ring: Vec<f64>,
    /// Values written per level, capped at `p`. Slot validity without a sentinel.
    filled: Vec<usize>,
    /// Next slot to write per level.
    insert: Vec<usize>,
    /// Running sum of x(t)·x(t−j), shape [num_levels][p].
    corr_sum: Vec<f64>,
    /// Number of pairs contributing to `corr_sum`, shape [num_levels][p].
    corr_count: Vec<u64>,
    /// Pending block sum per level, flushed to the next level every `m` values.
    block_sum: Vec<f64>,
    block_count: Vec<usize>,
    /// Highest level that ever received a value.
    deepest: usize,
    /// Sum of every raw sample, for the optional mean offset.
    level0_total: f64,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::build(CorrelatorConfig::default())
    }
}

impl Correlator {
    /// Build a correlator with the given cascade shape.
    pub fn new(config: CorrelatorConfig) -> Result<Self, CorrelatorError> {
        config.validate()?;
        log::debug!(
            "multi-tau correlator: {} levels x {} points, averaging {}",
            config.num_levels,
            config.points_per_level,
            config.min_samples_to_average
        );
        Ok(Self::build(config))
    }

    fn build(config: CorrelatorConfig) -> Self {
        let n_levels = config.num_levels;
        let p = config.points_per_level;
        Self {
            config,
            p,
            m: config.min_samples_to_average,
            min_lag: config.min_lag_index(),
            ring: vec![0.0; n_levels * p],
            filled: vec![0; n_levels],
            insert: vec![0; n_levels],
            corr_sum: vec![0.0; n_levels * p],
            corr_count: vec![0; n_levels * p],
            block_sum: vec![0.0; n_levels],
            block_count: vec![0; n_levels],
            deepest: 0,
            level0_total: 0.0,
        }
    }

    pub fn config(&self) -> &CorrelatorConfig {
        &self.config
    }

    pub fn min_lag_index(&self) -> usize {
        self.min_lag
    }

    /// Highest level that has received data so far.
    pub fn deepest_level(&self) -> usize {
        self.deepest
    }

    /// Number of raw samples ingested at level 0.
    pub fn samples_added(&self) -> u64 {
        self.corr_count[0]
    }

    /// Ingest one raw sample.
    pub fn add(&mut self, value: f64) {
        self.add_at(0, value);
    }

    /// Ingest `value` directly at `level`.
    ///
    /// Every `m`-th value at a level is followed by the mean of the last `m`
    /// values being pushed one level up, cascading as far as the block
    /// counters allow. Values reaching `num_levels` or beyond are dropped.
    pub fn add_at(&mut self, level: usize, value: f64) {
        let mut level = level;
        let mut value = value;

        while level < self.config.num_levels {
            if level > self.deepest {
                self.deepest = level;
            }
            if level == 0 {
                self.level0_total += value;
            }

            self.record(level, value);

            self.block_sum[level] += value;
            self.block_count[level] += 1;
            if self.block_count[level] < self.m {
                return;
            }
            value = self.block_sum[level] / self.m as f64;
            self.block_sum[level] = 0.0;
            self.block_count[level] = 0;
            level += 1;
        }
    }

    /// Write `value` into the ring of `level` and correlate it against the
    /// values already there.
    fn record(&mut self, level: usize, value: f64) {
        let p = self.p;
        let base = level * p;
        let pos = self.insert[level];

        self.ring[base + pos] = value;
        if self.filled[level] < p {
            self.filled[level] += 1;
        }

        // Lags below min_lag are already resolved by the finer level.
        let first_lag = if level == 0 { 0 } else { self.min_lag };
        let ring = &self.ring[base..base + p];
        let sums = &mut self.corr_sum[base..base + p];
        let counts = &mut self.corr_count[base..base + p];
        for lag in first_lag..self.filled[level] {
            let partner = (pos + p - lag) % p;
            sums[lag] += value * ring[partner];
            counts[lag] += 1;
        }

        self.insert[level] = (pos + 1) % p;
    }

    /// Assemble the correlation estimate from every populated lag slot.
    ///
    /// With `normalize`, the squared mean of the raw samples is subtracted from
    /// every value. Does not modify the accumulated sums, so repeated calls
    /// return identical results.
    pub fn evaluate(&self, normalize: bool) -> Correlation {
        let p = self.p;
        let n0 = self.corr_count[0];
        let offset = if normalize && n0 > 0 {
            let mean = self.level0_total / n0 as f64;
            mean * mean
        } else {
            0.0
        };

        let mut out = Correlation::with_capacity(self.config.max_output_len());
        let mut stride = 1u64;
        for level in 0..=self.deepest {
            let first_lag = if level == 0 { 0 } else { self.min_lag };
            let base = level * p;
            for lag in first_lag..p {
                let count = self.corr_count[base + lag];
                if count == 0 {
                    continue;
                }
                let value = self.corr_sum[base + lag] / count as f64 - offset;
                out.push(lag as u64 * stride, value);
            }
            stride = stride.saturating_mul(self.m as u64);
        }
        out
    }
}
