//! # TrekReturns Analytics Engine
//!
//! This crate holds the quantitative core: how a basket of instruments would
//! have performed had it been bought on any past month and held for a fixed
//! number of years.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** No I/O. It depends only on `core-types`.
//! - **Stateless calculation:** `AnalyticsEngine` takes a `PriceTable` and
//!   validated `AnalysisParams` and produces a `PerformanceReport`.
//!
//! ## Public API
//!
//! - `normalize`, `rolling_returns`, `sharpe_ratio`: the three core transforms.
//! - `AnalyticsEngine`: runs them together with the distribution statistics.
//! - `PerformanceReport`: everything a renderer needs.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod returns;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{DrawdownStatistics, PerformanceReport, SummaryStatistics};
pub use returns::{annualize, normalize, rolling_returns, sharpe_ratio};
