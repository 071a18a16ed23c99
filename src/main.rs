use analytics::AnalyticsEngine;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use configuration::settings::Config;
use configuration::{DataConfig, OutputFormat, init_tracing, load_config};
use price_data::PriceSource;
use std::path::PathBuf;

mod render;

/// The main entry point for the TrekReturns application.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only supplies optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backtest tool for the data-driven retail investor: how would it have been
/// if I had bought this basket a while ago?
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute rolling annualized returns and their statistics for a weighted basket.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Configuration file. Missing files are ignored.
    #[arg(long, default_value = "trek.toml")]
    config: PathBuf,

    /// Tickers, comma separated (e.g. "AAPL, TSLA").
    #[arg(long)]
    tickers: Option<String>,

    /// Weights in percent, comma separated, summing to 100 (e.g. "40, 60").
    #[arg(long)]
    weights: Option<String>,

    /// Rolling return window size in years (1-999).
    #[arg(long)]
    years: Option<String>,

    /// Risk-free return in percent, used for the Sharpe ratio.
    #[arg(long)]
    risk_free: Option<String>,

    /// Wide CSV with a date column and one column per ticker.
    #[arg(long, conflicts_with = "data_dir")]
    prices: Option<PathBuf>,

    /// Directory holding one <TICKER>.csv file per ticker.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Resample the loaded prices to one close per month.
    #[arg(long)]
    monthly: bool,

    /// Maximum number of consecutive missing months to forward-fill.
    #[arg(long)]
    ffill_limit: Option<usize>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Also print the normalized (base 100) price table.
    #[arg(long)]
    show_normalized: bool,

    /// Append log lines to this file as well as stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Command-line values win over the configuration file and environment.
    fn apply_to(self, config: &mut Config) {
        if let Some(tickers) = self.tickers {
            config.analysis.tickers = tickers;
        }
        if let Some(weights) = self.weights {
            config.analysis.weights = weights;
        }
        if let Some(years) = self.years {
            config.analysis.years = years;
        }
        if let Some(risk_free) = self.risk_free {
            config.analysis.risk_free = risk_free;
        }
        if self.prices.is_some() || self.data_dir.is_some() {
            config.data.prices = self.prices;
            config.data.data_dir = self.data_dir;
        }
        config.data.monthly |= self.monthly;
        if let Some(limit) = self.ffill_limit {
            config.data.ffill_limit = limit;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.output.show_normalized |= self.show_normalized;
        if self.log_file.is_some() {
            config.logging.file = self.log_file;
        }
    }
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of one analysis run. The first failing stage
/// aborts the run; nothing after it is printed.
fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    args.apply_to(&mut config);

    // Held until the end of the run so file logs are flushed.
    let _log_guard = init_tracing(&config.logging)?;

    let params = config.analysis.validate().context("Invalid analysis input")?;
    let source = price_source(&config.data)?;

    let mut prices = price_data::load_prices(&source, &params.tickers, config.data.monthly)
        .context("Failed to retrieve ticker data")?;
    let filled = prices.forward_fill(config.data.ffill_limit);
    if filled > 0 {
        tracing::info!("Forward-filled {} missing prices", filled);
    }

    let report = AnalyticsEngine::new()
        .calculate(&prices, &params)
        .context("Failed to generate rolling returns")?;

    match config.output.format {
        OutputFormat::Table => {
            render::print_report(&report, &params.weights, config.output.show_normalized)
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Picks the price source; exactly one of the two locations must be set.
fn price_source(data: &DataConfig) -> anyhow::Result<PriceSource> {
    match (&data.prices, &data.data_dir) {
        (Some(path), None) => Ok(PriceSource::WideCsv(path.clone())),
        (None, Some(dir)) => Ok(PriceSource::TickerDir(dir.clone())),
        (Some(_), Some(_)) => bail!("Set either a prices file or a data directory, not both"),
        (None, None) => bail!("No price data given: pass --prices <FILE> or --data-dir <DIR>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AnalyzeArgs {
        let cli = Cli::parse_from(std::iter::once("trek-returns").chain(args.iter().copied()));
        match cli.command {
            Commands::Analyze(args) => args,
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let mut config = Config::default();
        parse(&[
            "analyze",
            "--tickers",
            "spy",
            "--weights",
            "100",
            "--prices",
            "monthly.csv",
            "--format",
            "json",
        ])
        .apply_to(&mut config);

        assert_eq!(config.analysis.tickers, "spy");
        assert_eq!(config.analysis.weights, "100");
        assert_eq!(config.analysis.years, "8");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(
            price_source(&config.data).unwrap(),
            PriceSource::WideCsv(PathBuf::from("monthly.csv"))
        );
    }

    #[test]
    fn cli_data_dir_replaces_configured_file() {
        let mut config = Config::default();
        config.data.prices = Some(PathBuf::from("from-config.csv"));

        parse(&["analyze", "--data-dir", "history"]).apply_to(&mut config);

        assert_eq!(
            price_source(&config.data).unwrap(),
            PriceSource::TickerDir(PathBuf::from("history"))
        );
    }

    #[test]
    fn a_price_source_is_required() {
        assert!(price_source(&DataConfig::default()).is_err());
    }
}
