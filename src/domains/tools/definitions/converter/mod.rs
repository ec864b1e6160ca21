//! Converter tools.

pub mod integer_base;
pub mod nato_alphabet;
pub mod roman;

pub use integer_base::IntegerBaseConverterTool;
pub use nato_alphabet::NatoPhoneticAlphabetTool;
pub use roman::RomanConverterTool;
