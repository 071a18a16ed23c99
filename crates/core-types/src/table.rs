use crate::error::CoreError;
use chrono::NaiveDate;
use serde::Serialize;

/// A date-indexed table of closing prices with one column per instrument.
///
/// Rows are strictly ascending by date. A cell is `None` where the source had
/// no observation for that instrument on that date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    // Column-major: `columns[c][r]` is the price of `tickers[c]` on `dates[r]`.
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Builds a table, validating its shape and contents.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if the column count does not match the
    /// ticker count, a column length does not match the date count, dates are
    /// not strictly ascending, a ticker is repeated, or a price is negative or
    /// not finite.
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        if tickers.len() != columns.len() {
            return Err(CoreError::InvalidInput(
                "price table".to_string(),
                format!("{} tickers but {} columns", tickers.len(), columns.len()),
            ));
        }

        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(CoreError::InvalidInput(
                "price table".to_string(),
                format!("dates must be strictly ascending, found {} after {}", pair[1], pair[0]),
            ));
        }

        for (i, ticker) in tickers.iter().enumerate() {
            if tickers[..i].contains(ticker) {
                return Err(CoreError::InvalidInput(
                    "price table".to_string(),
                    format!("ticker '{ticker}' appears more than once"),
                ));
            }

            let column = &columns[i];
            if column.len() != dates.len() {
                return Err(CoreError::InvalidInput(
                    ticker.clone(),
                    format!("{} values for {} dates", column.len(), dates.len()),
                ));
            }
            if let Some(bad) = column.iter().flatten().find(|p| !p.is_finite() || **p < 0.0) {
                return Err(CoreError::InvalidInput(
                    ticker.clone(),
                    format!("price {bad} is not a non-negative number"),
                ));
            }
        }

        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    /// Number of rows (dates).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// The price column of `ticker`, if the table has one.
    pub fn column(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterates over `(ticker, column)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Returns a new table with only `tickers`, in the requested order.
    pub fn select(&self, tickers: &[String]) -> Result<Self, CoreError> {
        let mut columns = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let column = self
                .column(ticker)
                .ok_or_else(|| CoreError::UnknownTicker(ticker.clone()))?;
            columns.push(column.to_vec());
        }
        Self::new(self.dates.clone(), tickers.to_vec(), columns)
    }

    /// Propagates the last observed price into at most `limit` consecutive
    /// missing cells of each column. Leading gaps are left untouched.
    ///
    /// Returns the number of cells that were filled.
    pub fn forward_fill(&mut self, limit: usize) -> usize {
        let mut filled = 0;

        for column in &mut self.columns {
            let mut last_seen = None;
            let mut gap_len = 0;

            for cell in column.iter_mut() {
                match *cell {
                    Some(price) => {
                        last_seen = Some(price);
                        gap_len = 0;
                    }
                    None => {
                        if let Some(price) = last_seen {
                            if gap_len < limit {
                                *cell = Some(price);
                                filled += 1;
                            }
                            gap_len += 1;
                        }
                    }
                }
            }
        }

        tracing::debug!(limit, filled, "Forward-filled price gaps");
        filled
    }

    /// Returns a copy without any row that has a missing cell.
    pub fn drop_incomplete_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&row| self.columns.iter().all(|column| column[row].is_some()))
            .collect();

        Self {
            dates: keep.iter().map(|&row| self.dates[row]).collect(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| keep.iter().map(|&row| column[row]).collect())
                .collect(),
        }
    }

    /// First and last date on which every instrument has a price.
    pub fn complete_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let complete = self.drop_incomplete_rows();
        Some((*complete.dates.first()?, *complete.dates.last()?))
    }
}
