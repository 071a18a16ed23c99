use crate::error::AnalyticsError;
use crate::stats::round_to;
use core_types::{PriceTable, ReturnSeries, Weights};

/// Price tables are monthly, so a window of `n` years spans `12 * n` rows.
pub const MONTHS_PER_YEAR: usize = 12;

/// Rebases every column to 100 at its first observed price.
///
/// Missing cells stay missing, and a column without any observation comes back
/// entirely missing.
pub fn normalize(prices: &PriceTable) -> Result<PriceTable, AnalyticsError> {
    let mut columns = Vec::with_capacity(prices.tickers().len());

    for (ticker, column) in prices.columns() {
        let normalized = match column.iter().flatten().next() {
            None => vec![None; column.len()],
            Some(&base) if base == 0.0 => return Err(AnalyticsError::ZeroBase(ticker.to_string())),
            // Dividing first keeps the base row at exactly 100.
            Some(&base) => column.iter().map(|p| p.map(|v| v / base * 100.0)).collect(),
        };
        columns.push(normalized);
    }

    Ok(PriceTable::new(
        prices.dates().to_vec(),
        prices.tickers().to_vec(),
        columns,
    )?)
}

/// The constant yearly rate that compounds to `ratio` over `years`.
pub fn annualize(ratio: f64, years: u32) -> f64 {
    ratio.powf(1.0 / f64::from(years)) - 1.0
}

/// Weighted annualized return of holding the basket for `window_years`,
/// for every start date that has a full window ahead of it.
///
/// Rows with any missing price are dropped first; the window is then counted
/// in rows of the remaining table. Start dates whose combined return is not
/// finite (a zero start price) are skipped.
pub fn rolling_returns(
    prices: &PriceTable,
    window_years: u32,
    weights: &Weights,
) -> Result<ReturnSeries, AnalyticsError> {
    if window_years == 0 {
        return Err(AnalyticsError::InvalidWindow(window_years));
    }
    if weights.len() != prices.tickers().len() {
        return Err(AnalyticsError::WeightMismatch {
            weights: weights.len(),
            columns: prices.tickers().len(),
        });
    }

    let complete = prices.drop_incomplete_rows();
    let offset = window_years as usize * MONTHS_PER_YEAR;
    let columns: Vec<&[Option<f64>]> = complete.columns().map(|(_, column)| column).collect();

    let mut series = ReturnSeries::new(window_years);
    let mut skipped = 0;

    for start in 0..complete.len().saturating_sub(offset) {
        let end = start + offset;
        let value: Option<f64> = columns
            .iter()
            .zip(weights.as_f64())
            .map(|(column, weight)| {
                let ratio = column[end]? / column[start]?;
                Some(weight * annualize(ratio, window_years))
            })
            .sum();

        match value {
            Some(v) if v.is_finite() => series.push(complete.dates()[start], v),
            _ => skipped += 1,
        }
    }

    tracing::debug!(
        rows = prices.len(),
        complete_rows = complete.len(),
        points = series.len(),
        skipped,
        "Computed rolling returns"
    );

    Ok(series)
}

/// Excess return per unit of volatility, scaled by 100 and rounded to three
/// decimals. All inputs share the same units (fractions).
///
/// A zero `std_dev` gives an infinite (or NaN) result; callers guard it.
pub fn sharpe_ratio(mean_return: f64, risk_free: f64, std_dev: f64) -> f64 {
    round_to((mean_return - risk_free) / std_dev * 100.0, 3)
}
