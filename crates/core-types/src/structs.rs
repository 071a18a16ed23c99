use crate::error::CoreError;
use chrono::{Months, NaiveDate};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio weights, one per instrument, each in `[0, 1]` and summing to 1.
///
/// The decimal values are kept for exact validation and display; the `f64`
/// mirror is what the return calculations consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weights {
    values: Vec<Decimal>,
    #[serde(skip)]
    as_f64: Vec<f64>,
}

impl Weights {
    /// Builds weights from fractions (`0.4` for 40%).
    pub fn new(values: Vec<Decimal>) -> Result<Self, CoreError> {
        if values.is_empty() {
            return Err(CoreError::InvalidInput(
                "weights".to_string(),
                "at least one weight is required".to_string(),
            ));
        }

        if let Some(bad) = values.iter().find(|w| **w < Decimal::ZERO || **w > Decimal::ONE) {
            return Err(CoreError::InvalidInput(
                "weights".to_string(),
                format!("{}% is outside 0-100%", *bad * Decimal::ONE_HUNDRED),
            ));
        }

        let sum: Decimal = values.iter().sum();
        if sum != Decimal::ONE {
            return Err(CoreError::WeightSum((sum * Decimal::ONE_HUNDRED).normalize()));
        }

        let as_f64 = values
            .iter()
            .map(|w| {
                w.to_f64().ok_or_else(|| {
                    CoreError::InvalidInput("weights".to_string(), format!("{w} is not representable"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values, as_f64 })
    }

    /// Builds weights from percentages (`40` for 40%).
    pub fn from_percentages(percentages: &[Decimal]) -> Result<Self, CoreError> {
        Self::new(percentages.iter().map(|p| *p / Decimal::ONE_HUNDRED).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_decimals(&self) -> &[Decimal] {
        &self.values
    }

    pub fn as_f64(&self) -> &[f64] {
        &self.as_f64
    }
}

/// Validated inputs for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisParams {
    /// Upper-cased instrument identifiers, aligned with `weights`.
    pub tickers: Vec<String>,
    pub weights: Weights,
    /// Rolling window length in years (1..=999).
    pub window_years: u32,
    /// Risk-free rate in percent (`2.0` for 2%).
    pub risk_free_pct: f64,
}

/// One rolling-window observation: buying on `start` and selling on `end`
/// earned `value` per year (a fraction, `0.08` for 8%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub value: f64,
}

/// A date-indexed series of annualized portfolio returns over a fixed window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub window_years: u32,
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(window_years: u32) -> Self {
        Self {
            window_years,
            points: Vec::new(),
        }
    }

    /// Appends the return for a window starting on `start`. The end date is
    /// `start` shifted by the window length in calendar years.
    pub fn push(&mut self, start: NaiveDate, value: f64) {
        let end = start
            .checked_add_months(Months::new(self.window_years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MAX);
        self.points.push(ReturnPoint { start, end, value });
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_weights_summing_to_one() {
        let weights = Weights::from_percentages(&[dec!(40), dec!(60)]).unwrap();
        assert!((weights.as_f64()[0] - 0.4).abs() < 1e-12);
        assert!((weights.as_f64()[1] - 0.6).abs() < 1e-12);
        assert_eq!(weights.as_decimals(), &[dec!(0.4), dec!(0.6)]);
    }

    #[test]
    fn thirds_must_still_sum_exactly() {
        assert!(Weights::from_percentages(&[dec!(33.3), dec!(33.3), dec!(33.4)]).is_ok());
        assert_eq!(
            Weights::from_percentages(&[dec!(33.3), dec!(33.3), dec!(33.3)]).unwrap_err(),
            CoreError::WeightSum(dec!(99.9))
        );
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let err = Weights::new(vec![dec!(0.4), dec!(0.59)]).unwrap_err();
        assert_eq!(err, CoreError::WeightSum(dec!(99)));
    }

    #[test]
    fn rejects_out_of_range_weight() {
        let err = Weights::new(vec![dec!(1.2), dec!(-0.2)]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(..)));
    }

    #[test]
    fn return_point_end_is_shifted_by_window() {
        let mut series = ReturnSeries::new(3);
        series.push(NaiveDate::from_ymd_opt(2010, 2, 1).unwrap(), 0.05);

        let point = series.points()[0];
        assert_eq!(point.end, NaiveDate::from_ymd_opt(2013, 2, 1).unwrap());
        assert_eq!(series.values(), vec![0.05]);
    }
}
