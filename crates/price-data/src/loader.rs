use crate::error::PriceDataError;
use chrono::NaiveDate;
use core_types::PriceTable;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DATE_COLUMNS: [&str; 3] = ["date", "datetime", "timestamp"];
const CLOSE_COLUMNS: [&str; 4] = ["close", "adj close", "adj_close", "adjclose"];

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.trim(Trim::All).flexible(true);
    builder
}

/// Load a wide price table: the first column holds dates, every other column
/// is one instrument named by its header.
///
/// Empty cells and `NaN`/`null` markers become missing values.
pub fn load_wide_csv(path: impl AsRef<Path>) -> Result<PriceTable, PriceDataError> {
    let path = path.as_ref();
    info!("Loading price table from: {}", path.display());
    read_wide(reader_builder().from_path(path)?)
}

/// Same as [`load_wide_csv`], reading from any byte source.
pub fn read_wide_csv<R: Read>(source: R) -> Result<PriceTable, PriceDataError> {
    read_wide(reader_builder().from_reader(source))
}

fn read_wide<R: Read>(mut reader: csv::Reader<R>) -> Result<PriceTable, PriceDataError> {
    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(PriceDataError::MissingColumn("price".to_string()));
    }
    let tickers: Vec<String> = headers.iter().skip(1).map(str::to_uppercase).collect();

    let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    let mut duplicates = 0;

    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        let date = parse_date(record.get(0).unwrap_or(""), line)?;

        let prices = tickers
            .iter()
            .enumerate()
            .map(|(idx, ticker)| parse_price(record.get(idx + 1).unwrap_or(""), ticker, line))
            .collect::<Result<Vec<_>, _>>()?;

        if rows.contains_key(&date) {
            duplicates += 1;
            continue;
        }
        rows.insert(date, prices);
    }

    if duplicates > 0 {
        warn!("Removed {} duplicate dates", duplicates);
    }

    let dates: Vec<NaiveDate> = rows.keys().copied().collect();
    let mut columns = vec![Vec::with_capacity(dates.len()); tickers.len()];
    for prices in rows.into_values() {
        for (column, price) in columns.iter_mut().zip(prices) {
            column.push(price);
        }
    }

    info!(
        "Loaded {} rows for {} tickers from {} to {}",
        dates.len(),
        tickers.len(),
        dates.first().map(ToString::to_string).unwrap_or_default(),
        dates.last().map(ToString::to_string).unwrap_or_default()
    );

    Ok(PriceTable::new(dates, tickers, columns)?)
}

/// Load one `<TICKER>.csv` per requested ticker from `dir` and merge them on
/// the union of their dates.
///
/// Each file needs a date column and a close column (`close`, falling back to
/// `adj close`); any other column is ignored.
pub fn load_ticker_dir(
    dir: impl AsRef<Path>,
    tickers: &[String],
) -> Result<PriceTable, PriceDataError> {
    let dir = dir.as_ref();
    info!("Loading {} ticker files from: {}", tickers.len(), dir.display());

    let mut series = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let path = find_ticker_file(dir, ticker)
            .ok_or_else(|| PriceDataError::TickerWithoutData(ticker.clone()))?;
        let observations = read_close_series(reader_builder().from_path(&path)?, ticker)?;
        debug!(ticker = %ticker, rows = observations.len(), "Loaded ticker file");
        series.push(observations);
    }

    let dates: Vec<NaiveDate> = series
        .iter()
        .flat_map(|s| s.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns = series
        .iter()
        .map(|s| dates.iter().map(|d| s.get(d).copied().flatten()).collect())
        .collect();

    Ok(PriceTable::new(dates, tickers.to_vec(), columns)?)
}

/// Read a single instrument's `date,close` history.
pub fn read_ticker_csv<R: Read>(
    source: R,
    ticker: &str,
) -> Result<BTreeMap<NaiveDate, Option<f64>>, PriceDataError> {
    read_close_series(reader_builder().from_reader(source), ticker)
}

fn read_close_series<R: Read>(
    mut reader: csv::Reader<R>,
    ticker: &str,
) -> Result<BTreeMap<NaiveDate, Option<f64>>, PriceDataError> {
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_lowercase).collect();
    let date_idx = find_column(&headers, &DATE_COLUMNS)
        .ok_or_else(|| PriceDataError::MissingColumn("date".to_string()))?;
    let close_idx = find_column(&headers, &CLOSE_COLUMNS)
        .ok_or_else(|| PriceDataError::MissingColumn("close".to_string()))?;

    let mut observations = BTreeMap::new();
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        let date = parse_date(record.get(date_idx).unwrap_or(""), line)?;
        let price = parse_price(record.get(close_idx).unwrap_or(""), ticker, line)?;
        observations.entry(date).or_insert(price);
    }

    Ok(observations)
}

/// Restrict `table` to `tickers`, failing on the first ticker that is absent
/// or has no observation at all.
pub fn select_with_data(
    table: &PriceTable,
    tickers: &[String],
) -> Result<PriceTable, PriceDataError> {
    for ticker in tickers {
        let has_data = table
            .column(ticker)
            .is_some_and(|column| column.iter().any(Option::is_some));
        if !has_data {
            return Err(PriceDataError::TickerWithoutData(ticker.clone()));
        }
    }
    Ok(table.select(tickers)?)
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    // Candidates are ordered by preference.
    candidates
        .iter()
        .find_map(|candidate| headers.iter().position(|h| h == candidate))
}

fn find_ticker_file(dir: &Path, ticker: &str) -> Option<PathBuf> {
    [ticker.to_string(), ticker.to_lowercase()]
        .iter()
        .map(|name| dir.join(format!("{name}.csv")))
        .find(|path| path.is_file())
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component
/// (`2020-01-01 00:00:00-05:00`), which is ignored.
fn parse_date(value: &str, line: u64) -> Result<NaiveDate, PriceDataError> {
    value
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .ok_or_else(|| PriceDataError::InvalidDate {
            value: value.to_string(),
            line,
        })
}

fn parse_price(value: &str, ticker: &str, line: u64) -> Result<Option<f64>, PriceDataError> {
    if value.is_empty() || ["nan", "null", "na"].contains(&value.to_lowercase().as_str()) {
        return Ok(None);
    }

    match value.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        _ => Err(PriceDataError::InvalidPrice {
            ticker: ticker.to_string(),
            value: value.to_string(),
            line,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn wide_csv_sorts_rows_and_reads_missing_cells() {
        let csv = "\
Date,aapl,TSLA
2020-02-01,11.0,
2020-01-01,10.0,NaN
2020-03-01 00:00:00-05:00,12.5,30.0
";
        let table = read_wide_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.tickers(), &["AAPL".to_string(), "TSLA".to_string()]);
        assert_eq!(table.dates(), &[date(2020, 1, 1), date(2020, 2, 1), date(2020, 3, 1)]);
        assert_eq!(table.column("AAPL").unwrap(), &[Some(10.0), Some(11.0), Some(12.5)]);
        assert_eq!(table.column("TSLA").unwrap(), &[None, None, Some(30.0)]);
    }

    #[test]
    fn wide_csv_keeps_first_of_duplicate_dates() {
        let csv = "date,SPY\n2020-01-01,1\n2020-01-01,2\n";
        let table = read_wide_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.column("SPY").unwrap(), &[Some(1.0)]);
    }

    #[test]
    fn bad_values_report_their_line() {
        let err = read_wide_csv("date,SPY\n2020-01-01,1\n2020-02-01,-4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PriceDataError::InvalidPrice { line: 3, .. }));

        let err = read_wide_csv("date,SPY\nJan 2020,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PriceDataError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn ticker_csv_prefers_close_over_adj_close() {
        let csv = "Date,Open,Adj Close,Close,Volume\n2021-05-03,1,2,3,100\n";
        let series = read_ticker_csv(csv.as_bytes(), "SPY").unwrap();
        assert_eq!(series.get(&date(2021, 5, 3)), Some(&Some(3.0)));

        let err = read_ticker_csv("Date,Open\n2021-05-03,1\n".as_bytes(), "SPY").unwrap_err();
        assert!(matches!(err, PriceDataError::MissingColumn(col) if col == "close"));
    }

    #[test]
    fn ticker_dir_merges_on_union_of_dates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("SPY.csv"), "date,close\n2020-01-01,100\n2020-02-01,101\n")
            .unwrap();
        std::fs::write(dir.path().join("agg.csv"), "date,close\n2020-02-01,50\n2020-03-01,51\n")
            .unwrap();

        let tickers = vec!["SPY".to_string(), "AGG".to_string()];
        let table = load_ticker_dir(dir.path(), &tickers).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.column("SPY").unwrap(), &[Some(100.0), Some(101.0), None]);
        assert_eq!(table.column("AGG").unwrap(), &[None, Some(50.0), Some(51.0)]);

        let err = load_ticker_dir(dir.path(), &["QQQ".to_string()]).unwrap_err();
        assert!(matches!(err, PriceDataError::TickerWithoutData(t) if t == "QQQ"));
    }

    #[test]
    fn select_with_data_rejects_empty_columns() {
        let table = read_wide_csv("date,SPY,DEAD\n2020-01-01,1,\n2020-02-01,2,\n".as_bytes()).unwrap();

        assert!(select_with_data(&table, &["SPY".to_string()]).is_ok());
        let err = select_with_data(&table, &["SPY".to_string(), "DEAD".to_string()]).unwrap_err();
        assert!(matches!(err, PriceDataError::TickerWithoutData(t) if t == "DEAD"));
        let err = select_with_data(&table, &["MISSING".to_string()]).unwrap_err();
        assert!(matches!(err, PriceDataError::TickerWithoutData(t) if t == "MISSING"));
    }
}
