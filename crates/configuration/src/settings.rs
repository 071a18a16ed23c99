use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `trek.toml`; missing sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisInput,
    pub data: DataConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Raw analysis inputs, exactly as a user types them.
///
/// They stay as text until `AnalysisInput::validate` turns them into
/// `core_types::AnalysisParams`, so file, environment and CLI values all go
/// through the same checks.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisInput {
    /// Comma separated tickers, e.g. "AAPL, TSLA".
    pub tickers: String,
    /// Comma separated weight percentages, e.g. "40, 60".
    pub weights: String,
    /// Rolling window size in years.
    pub years: String,
    /// Risk-free return in percent, used for the Sharpe ratio.
    pub risk_free: String,
}

/// Where price history is read from and how it is cleaned.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// A single wide CSV: `date,<TICKER>,<TICKER>...`.
    pub prices: Option<PathBuf>,
    /// A directory holding one `<TICKER>.csv` per instrument.
    pub data_dir: Option<PathBuf>,
    /// Collapse daily (or irregular) rows to one observation per month.
    pub monthly: bool,
    /// Maximum number of consecutive missing months to forward-fill.
    pub ffill_limit: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Also print the normalized (base 100) price table.
    pub show_normalized: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Optional file that receives a copy of every log line.
    pub file: Option<PathBuf>,
}

// --- Default Implementations ---
// These mirror the values pre-filled in the original input form.

impl Default for AnalysisInput {
    fn default() -> Self {
        Self {
            tickers: "AAPL, TSLA".to_string(),
            weights: "40, 60".to_string(),
            years: "8".to_string(),
            risk_free: "2".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            prices: None,
            data_dir: None,
            monthly: false,
            ffill_limit: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
