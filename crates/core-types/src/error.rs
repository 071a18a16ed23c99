use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("The sum of weights must be 100%, current sum: {0}%")]
    WeightSum(Decimal),

    #[error("Ticker '{0}' is not present in the price table")]
    UnknownTicker(String),
}
