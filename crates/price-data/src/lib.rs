//! # TrekReturns Price Data
//!
//! Loads locally stored price history into a `PriceTable`. Downloading the
//! history is left to whatever tool produced the CSV files; this crate only
//! reads, cleans and selects.

pub mod error;
pub mod loader;
pub mod resample;

pub use error::PriceDataError;
pub use loader::{load_ticker_dir, load_wide_csv, read_ticker_csv, read_wide_csv, select_with_data};
pub use resample::resample_monthly;

use core_types::PriceTable;
use std::path::PathBuf;

/// Where a run reads its prices from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// One CSV with a date column followed by one column per ticker.
    WideCsv(PathBuf),
    /// A directory of `<TICKER>.csv` files.
    TickerDir(PathBuf),
}

/// Loads the prices of `tickers` from `source`, in the order requested.
///
/// Fails with `PriceDataError::TickerWithoutData` for the first ticker that
/// the source does not cover.
pub fn load_prices(
    source: &PriceSource,
    tickers: &[String],
    monthly: bool,
) -> Result<PriceTable, PriceDataError> {
    let table = match source {
        PriceSource::WideCsv(path) => load_wide_csv(path)?,
        PriceSource::TickerDir(dir) => load_ticker_dir(dir, tickers)?,
    };

    let table = if monthly {
        resample_monthly(&table)?
    } else {
        table
    };

    select_with_data(&table, tickers)
}
