use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Invalid weight format '{0}'. Please enter numbers separated by commas.")]
    InvalidWeights(String),

    #[error("Invalid rolling window '{0}'. Please enter a whole number of years.")]
    InvalidWindow(String),

    #[error("Rolling window must be between 1 and 999 years, got {0}")]
    WindowOutOfRange(i64),

    #[error("Invalid risk-free return '{0}'. Please enter a valid number.")]
    InvalidRiskFree(String),

    #[error("Risk-free return must be between 0 and 100%, got {0}%")]
    RiskFreeOutOfRange(f64),

    #[error("Number of weights ({weights}) does not match the number of tickers ({tickers})")]
    WeightCountMismatch { weights: usize, tickers: usize },

    #[error(transparent)]
    Weights(#[from] core_types::CoreError),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
