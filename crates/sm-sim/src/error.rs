use sm_core::{CoreError, CustomerId};
use sm_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("arrival model covers hours {first}..={last} but the run draws arrivals at hour {hour}")]
    ArrivalCoverage {
        hour:  u8,
        first: u8,
        last:  u8,
    },

    #[error("customer {0} has already checked out and cannot move")]
    CustomerExited(CustomerId),
}

pub type SimResult<T> = Result<T, SimError>;
