use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod input;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{AnalysisInput, DataConfig, LoggingConfig, OutputConfig, OutputFormat};

/// Prefix of the environment variables that override file values,
/// e.g. `TREK__ANALYSIS__YEARS=5`.
pub const ENV_PREFIX: &str = "TREK";

/// Loads the application configuration.
///
/// Sources are layered in order: built-in defaults, the TOML file at `path`
/// (skipped when it does not exist), then `TREK__*` environment variables.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.analysis.tickers, "AAPL, TSLA");
        assert_eq!(config.data.ffill_limit, 1);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[analysis]
tickers = "spy, agg"
weights = "70, 30"
years = "10"

[data]
prices = "prices/monthly.csv"
ffill_limit = 2

[output]
format = "json"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.analysis.tickers, "spy, agg");
        assert_eq!(config.analysis.risk_free, "2");
        assert_eq!(config.data.prices.as_deref(), Some(Path::new("prices/monthly.csv")));
        assert_eq!(config.data.ffill_limit, 2);
        assert_eq!(config.output.format, OutputFormat::Json);

        let params = config.analysis.validate().unwrap();
        assert_eq!(params.window_years, 10);
    }
}
