//! Terminal rendering of a `PerformanceReport`.

use analytics::{DrawdownStatistics, PerformanceReport, SummaryStatistics};
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{PriceTable, ReturnSeries, Weights};
use rust_decimal::Decimal;

/// Prints every section of the report to stdout, in reading order.
pub fn print_report(report: &PerformanceReport, weights: &Weights, show_normalized: bool) {
    println!("{}", composition_line(&report.tickers, weights));
    println!("{}", data_span_line(report.data_span));
    println!();

    if show_normalized {
        println!("Normalized prices (base 100)");
        println!("{}", normalized_table(&report.normalized));
        println!();
    }

    println!("{}-year rolling annualized returns", report.window_years);
    println!("{}", returns_table(&report.returns));
    println!();

    println!("Statistics");
    println!("{}", summary_table(&report.summary));
    println!();

    println!("Drawdown");
    println!("{}", drawdown_table(&report.drawdown));
    println!();

    println!("{}", sharpe_line(report.sharpe_ratio, report.risk_free_pct));
}

/// e.g. "Portfolio: AAPL 40%, TSLA 60%".
pub fn composition_line(tickers: &[String], weights: &Weights) -> String {
    let parts: Vec<String> = tickers
        .iter()
        .zip(weights.as_decimals())
        .map(|(ticker, weight)| {
            let pct = (*weight * Decimal::ONE_HUNDRED).normalize();
            format!("{ticker} {pct}%")
        })
        .collect();
    format!("Portfolio: {}", parts.join(", "))
}

pub fn data_span_line(span: Option<(NaiveDate, NaiveDate)>) -> String {
    match span {
        Some((first, last)) => format!(
            "Data: {} to {}",
            first.format("%Y-%m"),
            last.format("%Y-%m")
        ),
        None => "Data: no month with a price for every ticker".to_string(),
    }
}

pub fn sharpe_line(sharpe: Option<f64>, risk_free_pct: f64) -> String {
    match sharpe {
        Some(value) => format!("Sharpe ratio (risk-free {risk_free_pct}%): {value:.3}"),
        None => format!("Sharpe ratio (risk-free {risk_free_pct}%): n/a"),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn number(value: f64, decimals: usize) -> Cell {
    Cell::new(format!("{value:.decimals$}")).set_alignment(CellAlignment::Right)
}

pub fn normalized_table(prices: &PriceTable) -> Table {
    let mut table = new_table();

    let mut header = vec![Cell::new("Date")];
    header.extend(prices.tickers().iter().map(Cell::new));
    table.set_header(header);

    for (row, date) in prices.dates().iter().enumerate() {
        let mut cells = vec![Cell::new(date.format("%Y-%m-%d"))];
        for (_, column) in prices.columns() {
            cells.push(match column[row] {
                Some(value) => number(value, 2),
                None => Cell::new("").set_alignment(CellAlignment::Right),
            });
        }
        table.add_row(cells);
    }
    table
}

pub fn returns_table(returns: &ReturnSeries) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Start date", "End period date", "% annualized return"]);

    for point in returns.points() {
        table.add_row(vec![
            Cell::new(point.start.format("%Y-%m-%d")),
            Cell::new(point.end.format("%Y-%m-%d")),
            number(point.value * 100.0, 2),
        ]);
    }
    table
}

pub fn summary_table(summary: &SummaryStatistics) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Statistic", "Value"]);

    table.add_row(vec![
        Cell::new("count"),
        Cell::new(summary.periods).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![Cell::new("mean %"), number(summary.mean_pct, 2)]);
    table.add_row(vec![Cell::new("median %"), number(summary.median_pct, 2)]);
    table.add_row(vec![
        Cell::new("std %"),
        match summary.std_dev_pct {
            Some(std) => number(std, 2),
            None => Cell::new("n/a").set_alignment(CellAlignment::Right),
        },
    ]);
    table.add_row(vec![Cell::new("max %"), number(summary.max_pct, 2)]);
    table.add_row(vec![Cell::new("min %"), number(summary.min_pct, 2)]);
    table
}

pub fn drawdown_table(drawdown: &DrawdownStatistics) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Measure", "%"]);

    let rows = [
        ("Max drawdown", drawdown.max_drawdown_pct),
        ("10% quantile", drawdown.quantile_10_pct),
        ("Mean of returns below 10% quantile", drawdown.tail_mean_10_pct),
        ("5% quantile", drawdown.quantile_5_pct),
        ("Mean of returns below 5% quantile", drawdown.tail_mean_5_pct),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), number(value, 2)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn composition_shows_percentages() {
        let weights = Weights::from_percentages(&[dec!(40), dec!(60)]).unwrap();
        let tickers = vec!["AAPL".to_string(), "TSLA".to_string()];
        assert_eq!(composition_line(&tickers, &weights), "Portfolio: AAPL 40%, TSLA 60%");
    }

    #[test]
    fn span_and_sharpe_lines() {
        assert_eq!(
            data_span_line(Some((date(2010, 1), date(2020, 12)))),
            "Data: 2010-01 to 2020-12"
        );
        assert_eq!(sharpe_line(Some(160.0), 2.0), "Sharpe ratio (risk-free 2%): 160.000");
        assert!(sharpe_line(None, 2.0).ends_with("n/a"));
    }

    #[test]
    fn returns_table_lists_each_window() {
        let mut returns = ReturnSeries::new(1);
        returns.push(date(2010, 1), 0.0825);
        returns.push(date(2010, 2), -0.031);

        let rendered = returns_table(&returns).to_string();
        assert!(rendered.contains("End period date"));
        assert!(rendered.contains("2010-01-01"));
        assert!(rendered.contains("2011-01-01"));
        assert!(rendered.contains("8.25"));
        assert!(rendered.contains("-3.10"));
    }

    #[test]
    fn normalized_table_leaves_gaps_blank() {
        let prices = PriceTable::new(
            vec![date(2010, 1), date(2010, 2)],
            vec!["SPY".to_string()],
            vec![vec![Some(100.0), None]],
        )
        .unwrap();

        let rendered = normalized_table(&prices).to_string();
        assert!(rendered.contains("SPY"));
        assert!(rendered.contains("100.00"));
        assert!(rendered.contains("2010-02-01"));
    }

    #[test]
    fn statistics_tables_render_values() {
        let summary = SummaryStatistics::from_returns(&[0.05]).unwrap();
        let rendered = summary_table(&summary).to_string();
        assert!(rendered.contains("median %"));
        assert!(rendered.contains("5.00"));
        assert!(rendered.contains("n/a"));

        let drawdown = DrawdownStatistics::from_returns(&[-0.2, 0.1, 0.3]).unwrap();
        let rendered = drawdown_table(&drawdown).to_string();
        assert!(rendered.contains("Max drawdown"));
        assert!(rendered.contains("-20.00"));
    }
}
