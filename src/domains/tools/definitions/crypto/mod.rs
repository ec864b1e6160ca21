//! Crypto tools.

pub mod hash_text;
pub mod token_generator;
pub mod ulid_generator;

pub use hash_text::HashTextTool;
pub use token_generator::TokenGeneratorTool;
pub use ulid_generator::UlidGeneratorTool;
