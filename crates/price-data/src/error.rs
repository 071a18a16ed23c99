use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceDataError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not parse date '{value}' on line {line}")]
    InvalidDate { value: String, line: u64 },

    #[error("Invalid price '{value}' for {ticker} on line {line}")]
    InvalidPrice {
        ticker: String,
        value: String,
        line: u64,
    },

    #[error("Missing '{0}' column")]
    MissingColumn(String),

    #[error("Ticker '{0}' not found or has no data")]
    TickerWithoutData(String),

    #[error("Price table error: {0}")]
    Core(#[from] core_types::CoreError),
}
