use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrelatorError {
    #[error("invalid correlator configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),
}
