use sm_core::Location;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("historical corpus contains no complete sessions")]
    EmptyCorpus,

    #[error("no observed transitions out of {0}")]
    NoTransitions(Location),

    #[error("no arrival observations for hour {0}")]
    EmptyHour(u8),

    #[error("hour {hour} is outside the arrival model domain {first}..={last}")]
    HourOutOfDomain {
        hour:  u8,
        first: u8,
        last:  u8,
    },

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("invalid arrival bands: {0}")]
    InvalidBands(String),

    #[error("corpus parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
