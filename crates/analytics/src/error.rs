use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Got {weights} weights for {columns} price columns")]
    WeightMismatch { weights: usize, columns: usize },

    #[error("Rolling window must be at least one year, got {0}")]
    InvalidWindow(u32),

    #[error("Cannot normalize '{0}': its first price is zero")]
    ZeroBase(String),

    #[error("Error in price table: {0}")]
    Core(#[from] core_types::CoreError),
}
