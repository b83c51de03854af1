use validator::{Validate, ValidationError};

pub const DEFAULT_NUM_LEVELS: usize = 32;
pub const DEFAULT_POINTS_PER_LEVEL: usize = 16;
pub const DEFAULT_MIN_SAMPLES_TO_AVERAGE: usize = 2;

fn validate_correlator_config(cfg: &CorrelatorConfig) -> Result<(), ValidationError> {
    if cfg.num_levels < 1 {
        return Err(ValidationError::new("num_levels must be >= 1"));
    }
    if cfg.points_per_level < 1 {
        return Err(ValidationError::new("points_per_level must be >= 1"));
    }
    if cfg.min_samples_to_average < 1 {
        return Err(ValidationError::new("min_samples_to_average must be >= 1"));
    }
    if cfg.points_per_level % cfg.min_samples_to_average != 0 {
        return Err(ValidationError::new(
            "points_per_level must be a multiple of min_samples_to_average",
        ));
    }
    if cfg.max_lag().is_none() {
        return Err(ValidationError::new(
            "largest lag label overflows u64, reduce num_levels or min_samples_to_average",
        ));
    }
    Ok(())
}

/// Shape of a multi-tau cascade.
///
/// Level `k` holds `points_per_level` values, each the mean of
/// `min_samples_to_average^k` consecutive raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_correlator_config"))]
pub struct CorrelatorConfig {
    /// Number of cascade levels (ring buffers).
    pub num_levels: usize,
    /// Capacity of each level's ring buffer.
    pub points_per_level: usize,
    /// Averaging factor `m`: child values combined into one parent value.
    pub min_samples_to_average: usize,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            num_levels: DEFAULT_NUM_LEVELS,
            points_per_level: DEFAULT_POINTS_PER_LEVEL,
            min_samples_to_average: DEFAULT_MIN_SAMPLES_TO_AVERAGE,
        }
    }
}

impl CorrelatorConfig {
    pub fn new(num_levels: usize, points_per_level: usize, min_samples_to_average: usize) -> Self {
        Self {
            num_levels,
            points_per_level,
            min_samples_to_average,
        }
    }

    /// First lag slot computed on levels above 0.
    pub fn min_lag_index(&self) -> usize {
        self.points_per_level / self.min_samples_to_average
    }

    /// `min_samples_to_average^level`, the raw-sample stride of one slot at `level`.
    pub fn level_stride(&self, level: usize) -> Option<u64> {
        let exp = u32::try_from(level).ok()?;
        (self.min_samples_to_average as u64).checked_pow(exp)
    }

    /// Largest lag label the cascade can produce, `None` on overflow or empty shape.
    pub fn max_lag(&self) -> Option<u64> {
        let top = self.num_levels.checked_sub(1)?;
        let last_slot = self.points_per_level.checked_sub(1)? as u64;
        self.level_stride(top)?.checked_mul(last_slot)
    }

    /// Upper bound on the number of (lag, value) pairs one evaluation can emit.
    pub fn max_output_len(&self) -> usize {
        let upper = self.points_per_level - self.min_lag_index();
        self.points_per_level + (self.num_levels - 1) * upper
    }
}
