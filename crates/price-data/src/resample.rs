use crate::error::PriceDataError;
use chrono::{Datelike, NaiveDate};
use core_types::PriceTable;

/// Collapse a table to one row per calendar month.
///
/// Each month keeps the last observed price of every instrument within that
/// month and is dated on the first day of the month, matching the layout of a
/// monthly close history. A month in which an instrument has no observation
/// stays missing for that instrument.
pub fn resample_monthly(table: &PriceTable) -> Result<PriceTable, PriceDataError> {
    let mut months: Vec<NaiveDate> = Vec::new();
    // Index of the month bucket each source row falls into.
    let mut bucket_of_row = Vec::with_capacity(table.len());

    for date in table.dates() {
        let month = date.with_day(1).unwrap_or(*date);
        if months.last() != Some(&month) {
            months.push(month);
        }
        bucket_of_row.push(months.len() - 1);
    }

    let columns = table
        .columns()
        .map(|(_, column)| {
            let mut monthly = vec![None; months.len()];
            for (row, price) in column.iter().enumerate() {
                if price.is_some() {
                    monthly[bucket_of_row[row]] = *price;
                }
            }
            monthly
        })
        .collect();

    tracing::debug!(
        rows = table.len(),
        months = months.len(),
        "Resampled price table to monthly"
    );

    Ok(PriceTable::new(months, table.tickers().to_vec(), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn keeps_last_observation_of_each_month() {
        let table = PriceTable::new(
            vec![
                date(2020, 1, 2),
                date(2020, 1, 31),
                date(2020, 2, 3),
                date(2020, 2, 28),
                date(2020, 4, 1),
            ],
            vec!["SPY".to_string(), "AGG".to_string()],
            vec![
                vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
                vec![Some(10.0), None, Some(30.0), None, None],
            ],
        )
        .unwrap();

        let monthly = resample_monthly(&table).unwrap();

        assert_eq!(monthly.dates(), &[date(2020, 1, 1), date(2020, 2, 1), date(2020, 4, 1)]);
        assert_eq!(monthly.column("SPY").unwrap(), &[Some(2.0), Some(4.0), Some(5.0)]);
        // AGG's last January print was on the 2nd; April had none at all.
        assert_eq!(monthly.column("AGG").unwrap(), &[Some(10.0), Some(30.0), None]);
    }

    #[test]
    fn empty_table_stays_empty() {
        let table = PriceTable::new(vec![], vec!["SPY".to_string()], vec![vec![]]).unwrap();
        assert!(resample_monthly(&table).unwrap().is_empty());
    }
}
