//! Export functionality for learned Q-tables

pub mod table_csv;

pub use table_csv::TableCsvExporter;
