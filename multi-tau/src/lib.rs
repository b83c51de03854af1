pub mod config;
pub mod correlator;
pub mod error;
pub mod parallel;

pub use config::CorrelatorConfig;
pub use correlator::{Correlation, Correlator};
pub use error::CorrelatorError;
pub use parallel::{correlate_columns, evaluate_all};
