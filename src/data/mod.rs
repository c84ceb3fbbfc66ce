//! Data ingestion
//!
//! Raw CSV sources loaded into in-memory tables.

pub mod loader;
pub mod table;

pub use loader::{CsvLoader, DatasetLoader, RawDatasets};
pub use table::{Table, Value};
