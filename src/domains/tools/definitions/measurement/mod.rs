//! Measurement tools.

pub mod chronometer;
pub mod length;
pub mod temperature;

pub use chronometer::ChronometerTool;
pub use length::LengthUnitConverterTool;
pub use temperature::TemperatureConverterTool;
