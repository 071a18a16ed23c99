use crate::stats;
use chrono::NaiveDate;
use core_types::{PriceTable, ReturnSeries};
use serde::Serialize;

/// Descriptive statistics of the rolling return distribution.
///
/// Every `_pct` field is already a percentage (`8.0` for 8%).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub periods: usize,
    pub mean_pct: f64,
    pub median_pct: f64,
    pub std_dev_pct: Option<f64>, // Option<> because one period has no spread
    pub max_pct: f64,
    pub min_pct: f64,
}

impl SummaryStatistics {
    /// Returns `None` for an empty sample.
    pub fn from_returns(values: &[f64]) -> Option<Self> {
        let sorted = stats::sorted(values);
        Some(Self {
            periods: values.len(),
            mean_pct: stats::mean(values)? * 100.0,
            median_pct: stats::quantile_sorted(&sorted, 0.5)? * 100.0,
            std_dev_pct: stats::sample_std(values).map(|s| s * 100.0),
            max_pct: *sorted.last()? * 100.0,
            min_pct: *sorted.first()? * 100.0,
        })
    }
}

/// The painful side of the distribution: worst outcome and the low tail.
///
/// Values are percentages rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownStatistics {
    /// The 0% quantile, i.e. the worst annualized return observed.
    pub max_drawdown_pct: f64,
    pub quantile_10_pct: f64,
    /// Mean of the returns at or below the 10% quantile.
    pub tail_mean_10_pct: f64,
    pub quantile_5_pct: f64,
    /// Mean of the returns at or below the 5% quantile.
    pub tail_mean_5_pct: f64,
}

impl DrawdownStatistics {
    pub fn from_returns(values: &[f64]) -> Option<Self> {
        let sorted = stats::sorted(values);
        let q10 = stats::quantile_sorted(&sorted, 0.10)?;
        let q5 = stats::quantile_sorted(&sorted, 0.05)?;
        let as_pct = |v: f64| stats::round_to(v * 100.0, 2);

        Some(Self {
            max_drawdown_pct: as_pct(stats::quantile_sorted(&sorted, 0.0)?),
            quantile_10_pct: as_pct(q10),
            tail_mean_10_pct: as_pct(stats::tail_mean(values, q10)?),
            quantile_5_pct: as_pct(q5),
            tail_mean_5_pct: as_pct(stats::tail_mean(values, q5)?),
        })
    }
}

/// Everything one analysis run produces, ready for rendering.
///
/// This struct is the final output of the `AnalyticsEngine`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub tickers: Vec<String>,
    pub window_years: u32,
    pub risk_free_pct: f64,
    /// First and last month on which every selected instrument has a price.
    pub data_span: Option<(NaiveDate, NaiveDate)>,

    pub normalized: PriceTable,
    pub returns: ReturnSeries,

    pub summary: SummaryStatistics,
    pub drawdown: DrawdownStatistics,
    pub sharpe_ratio: Option<f64>, // Option<> for cases with no stdev
}
