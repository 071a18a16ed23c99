pub mod error;
pub mod structs;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{AnalysisParams, ReturnPoint, ReturnSeries, Weights};
pub use table::PriceTable;
