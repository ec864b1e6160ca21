//! Tool definitions module.
//!
//! One file per tool, grouped by category. Each tool exposes its display
//! metadata as associated constants and implements [`Tool`](super::Tool).

pub mod common;
pub mod converter;
pub mod crypto;
pub mod data;
pub mod development;
pub mod math;
pub mod measurement;
pub mod media;
pub mod network;
pub mod text;
pub mod web;

pub use converter::{IntegerBaseConverterTool, NatoPhoneticAlphabetTool, RomanConverterTool};
pub use crypto::{HashTextTool, TokenGeneratorTool, UlidGeneratorTool};
pub use data::{CsvToJsonFormatterTool, JsonToCsvFormatterTool};
pub use development::{GitCheatsheetTool, JsonMinifyTool, JsonPrettifyTool, XmlFormatterTool};
pub use math::{EtaCalculatorTool, MathEvaluatorTool, PercentageCalculatorTool};
pub use measurement::{ChronometerTool, LengthUnitConverterTool, TemperatureConverterTool};
pub use media::{QrCodeGeneratorTool, SvgPlaceholderGeneratorTool, WifiQrCodeGeneratorTool};
pub use network::{
    Ipv4AddressConverterTool, Ipv4RangeExpanderTool, Ipv4SubnetCalculatorTool,
    RandomPortGeneratorTool,
};
pub use text::{NumeronymGeneratorTool, StringObfuscatorTool, TextStatisticsTool};
pub use web::{BasicAuthGeneratorTool, SlugifyStringTool, UrlEncoderDecoderTool};
