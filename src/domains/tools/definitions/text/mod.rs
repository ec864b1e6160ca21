//! Text tools.

pub mod numeronym;
pub mod obfuscator;
pub mod statistics;

pub use numeronym::NumeronymGeneratorTool;
pub use obfuscator::StringObfuscatorTool;
pub use statistics::TextStatisticsTool;
