//! Data tools.

pub mod csv_to_json;
pub mod json_to_csv;

pub use csv_to_json::CsvToJsonFormatterTool;
pub use json_to_csv::JsonToCsvFormatterTool;
