//! Parsing and validation of the raw analysis inputs.
//!
//! Each check stops at the first failure; nothing downstream runs on
//! partially valid input.

use crate::error::ConfigError;
use crate::settings::AnalysisInput;
use core_types::{AnalysisParams, Weights};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const MIN_WINDOW_YEARS: i64 = 1;
pub const MAX_WINDOW_YEARS: i64 = 999;

impl AnalysisInput {
    /// Validates every field and assembles the parameters of one run.
    pub fn validate(&self) -> Result<AnalysisParams, ConfigError> {
        let tickers = parse_tickers(&self.tickers)?;
        let percentages = parse_weights(&self.weights)?;
        let window_years = parse_window(&self.years)?;
        let risk_free_pct = parse_risk_free(&self.risk_free)?;

        if percentages.len() != tickers.len() {
            return Err(ConfigError::WeightCountMismatch {
                weights: percentages.len(),
                tickers: tickers.len(),
            });
        }
        let weights = Weights::from_percentages(&percentages)?;

        tracing::debug!(?tickers, window_years, risk_free_pct, "Validated analysis input");

        Ok(AnalysisParams {
            tickers,
            weights,
            window_years,
            risk_free_pct,
        })
    }
}

/// Splits a comma separated ticker list, trimming and upper-casing each entry.
pub fn parse_tickers(text: &str) -> Result<Vec<String>, ConfigError> {
    let mut tickers: Vec<String> = Vec::new();

    for raw in text.split(',') {
        let ticker = raw.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "empty ticker in '{text}'"
            )));
        }
        if tickers.contains(&ticker) {
            return Err(ConfigError::ValidationError(format!(
                "ticker '{ticker}' is listed more than once"
            )));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

/// Parses comma separated weight percentages ("40, 60").
pub fn parse_weights(text: &str) -> Result<Vec<Decimal>, ConfigError> {
    text.split(',')
        .map(|raw| {
            let raw = raw.trim();
            Decimal::from_str(raw).map_err(|_| ConfigError::InvalidWeights(raw.to_string()))
        })
        .collect()
}

/// Parses the rolling window size. An empty value means one year.
pub fn parse_window(text: &str) -> Result<u32, ConfigError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(MIN_WINDOW_YEARS as u32);
    }

    let years: i64 = text
        .parse()
        .map_err(|_| ConfigError::InvalidWindow(text.to_string()))?;
    if !(MIN_WINDOW_YEARS..=MAX_WINDOW_YEARS).contains(&years) {
        return Err(ConfigError::WindowOutOfRange(years));
    }

    Ok(years as u32)
}

/// Parses the risk-free return in percent; it must lie strictly inside (0, 100).
/// An empty value reads as 0 and is therefore rejected.
pub fn parse_risk_free(text: &str) -> Result<f64, ConfigError> {
    let text = text.trim();
    let rate = if text.is_empty() {
        0.0
    } else {
        text.parse::<f64>()
            .map_err(|_| ConfigError::InvalidRiskFree(text.to_string()))?
    };

    // Written as a positive range check so NaN is rejected too.
    if !(rate > 0.0 && rate < 100.0) {
        return Err(ConfigError::RiskFreeOutOfRange(rate));
    }

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;
    use rust_decimal_macros::dec;

    fn input(tickers: &str, weights: &str, years: &str, risk_free: &str) -> AnalysisInput {
        AnalysisInput {
            tickers: tickers.to_string(),
            weights: weights.to_string(),
            years: years.to_string(),
            risk_free: risk_free.to_string(),
        }
    }

    #[test]
    fn default_input_is_valid() {
        let params = AnalysisInput::default().validate().unwrap();
        assert_eq!(params.tickers, vec!["AAPL".to_string(), "TSLA".to_string()]);
        assert_eq!(params.weights.as_decimals(), &[dec!(0.4), dec!(0.6)]);
        assert_eq!(params.window_years, 8);
        assert_eq!(params.risk_free_pct, 2.0);
    }

    #[test]
    fn tickers_are_trimmed_and_upper_cased() {
        assert_eq!(
            parse_tickers(" spy,  qqq ").unwrap(),
            vec!["SPY".to_string(), "QQQ".to_string()]
        );
        assert!(parse_tickers("SPY,,QQQ").is_err());
        assert!(parse_tickers("spy, SPY").is_err());
    }

    #[test]
    fn malformed_weights_are_rejected() {
        let err = parse_weights("40, sixty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeights(raw) if raw == "sixty"));
    }

    #[test]
    fn window_bounds() {
        assert_eq!(parse_window("").unwrap(), 1);
        assert_eq!(parse_window("999").unwrap(), 999);
        assert!(matches!(parse_window("0"), Err(ConfigError::WindowOutOfRange(0))));
        assert!(matches!(parse_window("1000"), Err(ConfigError::WindowOutOfRange(1000))));
        assert!(matches!(parse_window("-3"), Err(ConfigError::WindowOutOfRange(-3))));
        assert!(matches!(parse_window("2.5"), Err(ConfigError::InvalidWindow(_))));
    }

    #[test]
    fn risk_free_bounds() {
        assert_eq!(parse_risk_free("2.5").unwrap(), 2.5);
        assert!(matches!(parse_risk_free(""), Err(ConfigError::RiskFreeOutOfRange(_))));
        assert!(matches!(parse_risk_free("100"), Err(ConfigError::RiskFreeOutOfRange(_))));
        assert!(matches!(parse_risk_free("NaN"), Err(ConfigError::RiskFreeOutOfRange(_))));
        assert!(matches!(parse_risk_free("two"), Err(ConfigError::InvalidRiskFree(_))));
    }

    #[test]
    fn weight_count_must_match_tickers() {
        let err = input("AAPL, TSLA, MSFT", "40, 60", "5", "2").validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WeightCountMismatch { weights: 2, tickers: 3 }
        ));
    }

    #[test]
    fn weights_must_sum_to_one_hundred() {
        let err = input("AAPL, TSLA", "40, 59", "5", "2").validate().unwrap_err();
        assert!(matches!(err, ConfigError::Weights(CoreError::WeightSum(sum)) if sum == dec!(99)));
    }
}
