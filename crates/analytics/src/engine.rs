use crate::error::AnalyticsError;
use crate::report::{DrawdownStatistics, PerformanceReport, SummaryStatistics};
use crate::returns::{normalize, rolling_returns, sharpe_ratio, MONTHS_PER_YEAR};
use crate::stats;
use core_types::{AnalysisParams, PriceTable};

/// Standard deviations below this are treated as zero when deriving the
/// Sharpe ratio; a flat return series has no meaningful ratio.
const MIN_STD_DEV: f64 = 1e-12;

/// A stateless calculator for deriving rolling-return metrics from a price table.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `prices` - Monthly closes, already forward-filled. May hold more
    ///   instruments than `params.tickers`; only the requested ones are used.
    /// * `params` - Validated tickers, weights, window and risk-free rate.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport` or an `AnalyticsError`.
    pub fn calculate(
        &self,
        prices: &PriceTable,
        params: &AnalysisParams,
    ) -> Result<PerformanceReport, AnalyticsError> {
        let selected = prices.select(&params.tickers)?;

        // 1. Rebase prices for side-by-side comparison.
        let normalized = normalize(&selected)?;

        // 2. Rolling annualized returns of the weighted basket.
        let returns = rolling_returns(&selected, params.window_years, &params.weights)?;
        if returns.is_empty() {
            let complete_rows = selected.drop_incomplete_rows().len();
            return Err(AnalyticsError::NotEnoughData(format!(
                "{} complete monthly rows, a {}-year window needs more than {}",
                complete_rows,
                params.window_years,
                params.window_years as usize * MONTHS_PER_YEAR
            )));
        }

        // 3. Distribution statistics.
        let values = returns.values();
        let summary = SummaryStatistics::from_returns(&values)
            .ok_or_else(|| AnalyticsError::NotEnoughData("empty return series".to_string()))?;
        let drawdown = DrawdownStatistics::from_returns(&values)
            .ok_or_else(|| AnalyticsError::NotEnoughData("empty return series".to_string()))?;

        // 4. Risk-adjusted return.
        let sharpe_ratio = self.calculate_sharpe(&values, params.risk_free_pct);

        tracing::info!(
            points = returns.len(),
            mean_pct = summary.mean_pct,
            sharpe = ?sharpe_ratio,
            "Calculated {}-year rolling returns",
            params.window_years
        );

        Ok(PerformanceReport {
            tickers: params.tickers.clone(),
            window_years: params.window_years,
            risk_free_pct: params.risk_free_pct,
            data_span: selected.complete_span(),
            normalized,
            returns,
            summary,
            drawdown,
            sharpe_ratio,
        })
    }

    /// Sharpe ratio of the return series against a risk-free rate given in
    /// percent. `None` when the series has no measurable spread.
    fn calculate_sharpe(&self, values: &[f64], risk_free_pct: f64) -> Option<f64> {
        let std_dev = stats::sample_std(values)?;
        if std_dev < MIN_STD_DEV {
            return None;
        }
        let mean = stats::mean(values)?;
        Some(sharpe_ratio(mean, risk_free_pct / 100.0, std_dev))
    }
}
